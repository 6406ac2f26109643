//! Scenario header accessor: wholesale fetch, typed field getters, and
//! single-field setters with session invalidation.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::client::Client;
use crate::error::Error;
use crate::http::{Decoder, RequestOptions};

impl Client {
    /// The scenario header as a flat field map, fetching it on first
    /// access.
    ///
    /// The header is always refreshed wholesale from the server; partial
    /// local updates do not exist. Field setters such as
    /// [`Client::set_title`] send only the changed field and then drop this
    /// cache, so the next read re-fetches everything.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport error
    /// from the fetch.
    pub fn scenario_header(&mut self) -> Result<&Map<String, Value>, Error> {
        let header = match self.header.take() {
            Some(header) => header,
            None => self.request_scenario_header()?,
        };
        Ok(self.header.insert(header))
    }

    /// Fetches the scenario header from the server, replacing any cached
    /// copy.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport error
    /// from the fetch. On failure the previously cached header is kept.
    pub fn fetch_scenario_header(&mut self) -> Result<&Map<String, Value>, Error> {
        let header = self.request_scenario_header()?;
        Ok(self.header.insert(header))
    }

    fn request_scenario_header(&self) -> Result<Map<String, Value>, Error> {
        let id = self.require_scenario_id()?;
        let opts = RequestOptions::new().header("Connection", "close");
        let payload = self
            .transport
            .get(&format!("/scenarios/{id}"), Decoder::Json, opts)?;
        match payload.into_json()? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::Decode(
                "scenario header is not a JSON object".to_string(),
            )),
        }
    }

    /// Sends a partial header update and, on success, drops every cached
    /// per-scenario resource.
    ///
    /// The changed fields are wrapped under the service's `"scenario"`
    /// envelope key. A header change can alter what the engine returns for
    /// curves and flows, so the whole session cache set is invalidated, not
    /// just the header slot. A failed update invalidates nothing.
    ///
    /// # Errors
    ///
    /// Returns `NoScenarioId` if no scenario is bound, or a transport error
    /// from the update.
    pub fn update_scenario_header(&mut self, fields: Map<String, Value>) -> Result<(), Error> {
        let id = self.require_scenario_id()?;
        let body = serde_json::json!({ "scenario": fields });
        let opts = RequestOptions::new()
            .header("Connection", "close")
            .json(body);
        self.transport
            .put(&format!("/scenarios/{id}"), Decoder::Json, opts)?;
        self.reset_session();
        Ok(())
    }

    /// Area code of the scenario's region.
    pub fn area_code(&mut self) -> Result<String, Error> {
        str_field(self.scenario_header()?, "area_code")
    }

    /// Creation time, normalized to UTC at read time.
    pub fn created_at(&mut self) -> Result<DateTime<Utc>, Error> {
        utc_field(self.scenario_header()?, "created_at")
    }

    /// Last update time, normalized to UTC at read time.
    pub fn updated_at(&mut self) -> Result<DateTime<Utc>, Error> {
        utc_field(self.scenario_header()?, "updated_at")
    }

    /// Display group, if assigned.
    pub fn display_group(&mut self) -> Result<Option<String>, Error> {
        opt_str_field(self.scenario_header()?, "display_group")
    }

    /// Scenario end year.
    pub fn end_year(&mut self) -> Result<i64, Error> {
        int_field(self.scenario_header()?, "end_year")
    }

    /// Scenario start year.
    pub fn start_year(&mut self) -> Result<i64, Error> {
        int_field(self.scenario_header()?, "start_year")
    }

    /// Whether the scenario can be exported as ESDL.
    pub fn esdl_exportable(&mut self) -> Result<bool, Error> {
        bool_field(self.scenario_header()?, "esdl_exportable")
    }

    /// Whether the scenario is migrated along with engine updates.
    pub fn keep_compatible(&mut self) -> Result<bool, Error> {
        bool_field(self.scenario_header()?, "keep_compatible")
    }

    /// Sets the keep-compatible flag.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Client::update_scenario_header`].
    pub fn set_keep_compatible(&mut self, keep_compatible: bool) -> Result<(), Error> {
        self.update_scenario_header(single_field("keep_compatible", Value::Bool(keep_compatible)))
    }

    /// Ordering weight, if assigned.
    pub fn ordering(&mut self) -> Result<Option<i64>, Error> {
        opt_int_field(self.scenario_header()?, "ordering")
    }

    /// Whether the scenario is protected against engine-side changes.
    pub fn protected(&mut self) -> Result<bool, Error> {
        bool_field(self.scenario_header()?, "protected")
    }

    /// Sets the protected flag.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Client::update_scenario_header`].
    pub fn set_protected(&mut self, protected: bool) -> Result<(), Error> {
        self.update_scenario_header(single_field("protected", Value::Bool(protected)))
    }

    /// Whether the scenario rejects input changes.
    pub fn read_only(&mut self) -> Result<bool, Error> {
        bool_field(self.scenario_header()?, "read_only")
    }

    /// Sets the read-only flag.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Client::update_scenario_header`].
    pub fn set_read_only(&mut self, read_only: bool) -> Result<(), Error> {
        self.update_scenario_header(single_field("read_only", Value::Bool(read_only)))
    }

    /// Numeric scaling factor, if the scenario is scaled.
    pub fn scaling(&mut self) -> Result<Option<f64>, Error> {
        opt_f64_field(self.scenario_header()?, "scaling")
    }

    /// Source annotation, if assigned.
    pub fn source(&mut self) -> Result<Option<String>, Error> {
        opt_str_field(self.scenario_header()?, "source")
    }

    /// Template scenario this one was created from, if any.
    ///
    /// The service reports either a numeric id or a string; both are
    /// exposed as a string.
    pub fn template(&mut self) -> Result<Option<String>, Error> {
        let header = self.scenario_header()?;
        match header.get("template") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(Error::Decode(
                "header field \"template\" is neither a string nor a number".to_string(),
            )),
        }
    }

    /// Scenario title.
    pub fn title(&mut self) -> Result<String, Error> {
        str_field(self.scenario_header()?, "title")
    }

    /// Sets the scenario title.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Client::update_scenario_header`].
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), Error> {
        self.update_scenario_header(single_field("title", Value::String(title.into())))
    }

    /// Canonical URL of the scenario resource.
    pub fn scenario_url(&mut self) -> Result<String, Error> {
        str_field(self.scenario_header()?, "url")
    }
}

fn single_field(key: &str, value: Value) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(key.to_string(), value);
    fields
}

fn field<'a>(header: &'a Map<String, Value>, key: &str) -> Result<&'a Value, Error> {
    header
        .get(key)
        .ok_or_else(|| Error::Decode(format!("scenario header has no \"{key}\" field")))
}

fn str_field(header: &Map<String, Value>, key: &str) -> Result<String, Error> {
    field(header, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Decode(format!("header field \"{key}\" is not a string")))
}

fn opt_str_field(header: &Map<String, Value>, key: &str) -> Result<Option<String>, Error> {
    match header.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::Decode(format!(
            "header field \"{key}\" is not a string"
        ))),
    }
}

fn bool_field(header: &Map<String, Value>, key: &str) -> Result<bool, Error> {
    field(header, key)?
        .as_bool()
        .ok_or_else(|| Error::Decode(format!("header field \"{key}\" is not a boolean")))
}

fn int_field(header: &Map<String, Value>, key: &str) -> Result<i64, Error> {
    field(header, key)?
        .as_i64()
        .ok_or_else(|| Error::Decode(format!("header field \"{key}\" is not an integer")))
}

fn opt_int_field(header: &Map<String, Value>, key: &str) -> Result<Option<i64>, Error> {
    match header.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            Error::Decode(format!("header field \"{key}\" is not an integer"))
        }),
    }
}

fn opt_f64_field(header: &Map<String, Value>, key: &str) -> Result<Option<f64>, Error> {
    match header.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            Error::Decode(format!("header field \"{key}\" is not a number"))
        }),
    }
}

fn utc_field(header: &Map<String, Value>, key: &str) -> Result<DateTime<Utc>, Error> {
    let raw = field(header, key)?
        .as_str()
        .ok_or_else(|| Error::Decode(format!("header field \"{key}\" is not a string")))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| {
            Error::Decode(format!(
                "header field \"{key}\": \"{raw}\" is not an RFC 3339 timestamp: {e}"
            ))
        })
}
