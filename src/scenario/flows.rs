//! Energy flow table accessor.

use crate::client::Client;
use crate::error::Error;
use crate::http::{Decoder, RequestOptions};
use crate::table::Table;

impl Client {
    /// The energy flow breakdown, fetching it on first access.
    ///
    /// Rows are flow categories, columns are named series.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport or
    /// decode error from the fetch.
    pub fn energy_flows(&mut self) -> Result<&Table, Error> {
        let flows = match self.energy_flows.take() {
            Some(flows) => flows,
            None => self.request_energy_flows()?,
        };
        Ok(self.energy_flows.insert(flows))
    }

    /// Fetches the energy flow breakdown, replacing any cached copy.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport or
    /// decode error from the fetch. On failure the previously cached table
    /// is kept.
    pub fn fetch_energy_flows(&mut self) -> Result<&Table, Error> {
        let flows = self.request_energy_flows()?;
        Ok(self.energy_flows.insert(flows))
    }

    fn request_energy_flows(&self) -> Result<Table, Error> {
        let id = self.require_scenario_id()?;
        let opts = RequestOptions::new().header("Connection", "close");
        let payload =
            self.transport
                .get(&format!("/scenarios/{id}/energy_flow"), Decoder::Text, opts)?;
        Table::from_delimited_text(&payload.into_text()?)
    }
}
