//! Scenario-scoped resource accessors.
//!
//! Every resource follows the same shape: a cached read that fetches on
//! first access, an explicit `fetch_*` that always performs the round trip,
//! and a precondition check on the bound scenario id before any network
//! I/O. Mutating operations drop the whole cache set on success only.

/// Hourly electricity price curve and custom curve uploads.
pub mod curves;
/// Energy flow table.
pub mod flows;
/// Scenario header fields and setters.
pub mod header;
