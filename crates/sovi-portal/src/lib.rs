//! Social vulnerability index (SoVI) portal library.
//!
//! Houses the deterministic district scoring engine together with the
//! surrounding portal domain: indicator records, input validation, the
//! repository contract, the portal service, and the HTTP router that the
//! `sovi-portal-api` binary mounts.

pub mod config;
pub mod error;
pub mod sovi;
pub mod telemetry;
