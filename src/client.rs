//! Client session state: scenario binding, engine selection, proxies, and
//! the per-resource cache slots.

use log::debug;
use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::http::{ProxyMap, ProxySpec, Transport};
use crate::table::Table;

/// A session against the ETM engine API.
///
/// Holds a nullable scenario id, the transport configuration, and one lazily
/// populated cache slot per resource. Scenario-scoped data is fetched on
/// first access and held until a successful mutation, a scenario
/// reassignment, or an engine selection change invalidates it.
///
/// The call model is synchronous and blocking, and the cache slots are plain
/// instance state: a `Client` has a single logical owner, and concurrent use
/// from multiple threads must be serialized by the caller.
#[derive(Debug, Default)]
pub struct Client {
    pub(crate) transport: Transport,
    scenario_id: Option<String>,
    pub(crate) header: Option<Map<String, Value>>,
    pub(crate) hourly_electricity_price_curve: Option<Table>,
    pub(crate) energy_flows: Option<Table>,
}

impl Client {
    /// Creates a client against the production engine with no scenario
    /// bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `Config` error if validation fails or a proxy URL
    /// is rejected.
    pub fn from_config(config: ClientConfig) -> Result<Self, Error> {
        if let Some(error) = config.validate().into_iter().next() {
            return Err(error);
        }

        let mut client = Self::new();
        client.transport.set_beta_engine(config.beta_engine);
        client.transport.set_engine_url(config.engine_url.clone());
        client.transport.set_proxies(config.proxy_spec())?;
        client.scenario_id = config.scenario_id;
        Ok(client)
    }

    /// The bound scenario id, if any.
    pub fn scenario_id(&self) -> Option<&str> {
        self.scenario_id.as_deref()
    }

    /// Binds (or rebinds) the scenario id and drops all cached scenario
    /// data, so the next read of any resource fetches fresh.
    pub fn set_scenario_id(&mut self, id: impl Into<String>) {
        self.scenario_id = Some(id.into());
        self.reset_session();
    }

    /// Unbinds the scenario id and drops all cached scenario data.
    ///
    /// Scenario-scoped accessors fail with [`Error::NoScenarioId`] until a
    /// new id is bound.
    pub fn clear_scenario_id(&mut self) {
        self.scenario_id = None;
        self.reset_session();
    }

    /// Whether the beta engine deployment is selected.
    pub fn beta_engine(&self) -> bool {
        self.transport.beta_engine()
    }

    /// Selects between the production and beta engine deployments.
    ///
    /// The two deployments may serve different datasets, so all cached
    /// scenario data is dropped.
    pub fn set_beta_engine(&mut self, beta: bool) {
        self.transport.set_beta_engine(beta);
        self.reset_session();
    }

    /// Custom engine base URL override, if any.
    pub fn engine_url(&self) -> Option<&str> {
        self.transport.engine_url()
    }

    /// Overrides the engine base URL, e.g. for a self-hosted engine, or
    /// clears the override with `None`.
    ///
    /// A different endpoint may serve a different dataset, so all cached
    /// scenario data is dropped.
    pub fn set_engine_url(&mut self, url: Option<String>) {
        self.transport.set_engine_url(url);
        self.reset_session();
    }

    /// The currently configured proxy URLs.
    pub fn proxies(&self) -> &ProxyMap {
        self.transport.proxies()
    }

    /// Applies a proxy configuration; see [`Transport::set_proxies`].
    ///
    /// Proxies do not change which dataset is served, so cached data is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if a proxy URL is not parseable.
    pub fn set_proxies(&mut self, spec: ProxySpec) -> Result<(), Error> {
        self.transport.set_proxies(spec)
    }

    /// The base URL requests currently resolve against.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Drops every cached per-scenario resource at once.
    ///
    /// Reads after a reset fetch from the server again. Called internally
    /// after successful mutations and on scenario or engine changes; public
    /// for callers that know the server-side scenario changed out of band.
    pub fn reset_session(&mut self) {
        debug!("resetting session caches");
        self.header = None;
        self.hourly_electricity_price_curve = None;
        self.energy_flows = None;
    }

    /// The bound scenario id, or the precondition error.
    pub(crate) fn require_scenario_id(&self) -> Result<String, Error> {
        self.scenario_id.clone().ok_or(Error::NoScenarioId)
    }
}
