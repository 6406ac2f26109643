//! Client bindings for the Energy Transition Model (ETM) engine API.
//!
//! Binds a scenario id to a [`Client`], then exposes blocking, cached
//! accessors over the scenario header, the hourly electricity price curve,
//! and the energy flow table. Mutations invalidate the session caches so
//! subsequent reads re-fetch from the engine.
//!
//! ```no_run
//! use etm_client::Client;
//!
//! fn main() -> Result<(), etm_client::Error> {
//!     let mut client = Client::new();
//!     client.set_scenario_id("775752");
//!
//!     println!("{} ({})", client.title()?, client.area_code()?);
//!     let curve = client.hourly_electricity_price_curve()?;
//!     println!("{} hourly prices", curve.n_rows());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
/// Blocking HTTP transport: engine selection, proxies, verbs, and decoding.
pub mod http;
pub mod scenario;
pub mod table;

// Re-export the main types for convenience
pub use client::Client;
pub use config::ClientConfig;
pub use error::Error;
pub use http::{Decoder, Payload, ProxyMap, ProxySpec, RequestOptions, Transport};
pub use table::{Series, Table};
