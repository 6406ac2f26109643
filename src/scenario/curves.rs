//! Hourly electricity price curve accessor and custom curve uploads.

use crate::client::Client;
use crate::error::Error;
use crate::http::{Decoder, RequestOptions};
use crate::table::{Series, Table};

impl Client {
    /// The hourly electricity price curve, fetching it on first access.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport or
    /// decode error from the fetch.
    pub fn hourly_electricity_price_curve(&mut self) -> Result<&Table, Error> {
        let curve = match self.hourly_electricity_price_curve.take() {
            Some(curve) => curve,
            None => self.request_hourly_electricity_price_curve()?,
        };
        Ok(self.hourly_electricity_price_curve.insert(curve))
    }

    /// Fetches the hourly electricity price curve, replacing any cached
    /// copy.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport or
    /// decode error from the fetch. On failure the previously cached curve
    /// is kept.
    pub fn fetch_hourly_electricity_price_curve(&mut self) -> Result<&Table, Error> {
        let curve = self.request_hourly_electricity_price_curve()?;
        Ok(self.hourly_electricity_price_curve.insert(curve))
    }

    fn request_hourly_electricity_price_curve(&self) -> Result<Table, Error> {
        let id = self.require_scenario_id()?;
        let opts = RequestOptions::new().header("Connection", "close");
        let payload = self.transport.get(
            &format!("/scenarios/{id}/curves/electricity_price"),
            Decoder::Text,
            opts,
        )?;
        Table::from_delimited_text(&payload.into_text()?)
    }

    /// Uploads a custom input curve under the given curve key.
    ///
    /// The series is sent through the transport's file-form upload, named
    /// by the curve key. An attached curve changes what the engine computes,
    /// so on success every cached per-scenario resource is dropped.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport error
    /// from the upload. A failed upload invalidates nothing.
    pub fn set_custom_curve(&mut self, key: &str, series: &Series) -> Result<(), Error> {
        let id = self.require_scenario_id()?;
        let opts = RequestOptions::new().header("Connection", "close");
        self.transport.put_series(
            &format!("/scenarios/{id}/custom_curves/{key}"),
            series,
            Some(key),
            opts,
        )?;
        self.reset_session();
        Ok(())
    }

    /// Detaches the custom input curve under the given curve key.
    ///
    /// On success every cached per-scenario resource is dropped, same as an
    /// upload.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport error
    /// from the removal.
    pub fn remove_custom_curve(&mut self, key: &str) -> Result<(), Error> {
        let id = self.require_scenario_id()?;
        let opts = RequestOptions::new().header("Connection", "close");
        self.transport.delete(
            &format!("/scenarios/{id}/custom_curves/{key}"),
            Decoder::Text,
            opts,
        )?;
        self.reset_session();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::Client;
    use crate::error::Error;
    use crate::table::Series;

    #[test]
    fn curve_accessors_without_scenario_fail_before_any_io() {
        let mut client = Client::new();
        assert!(matches!(
            client.hourly_electricity_price_curve(),
            Err(Error::NoScenarioId)
        ));
        assert!(matches!(
            client.fetch_hourly_electricity_price_curve(),
            Err(Error::NoScenarioId)
        ));

        let series = Series::new("interconnector_1_price", vec![1.0, 2.0]);
        assert!(matches!(
            client.set_custom_curve("interconnector_1_price", &series),
            Err(Error::NoScenarioId)
        ));
        assert!(matches!(
            client.remove_custom_curve("interconnector_1_price"),
            Err(Error::NoScenarioId)
        ));
    }
}
