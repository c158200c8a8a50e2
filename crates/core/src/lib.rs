//! Leadflow domain core.
//!
//! Pure domain logic for the lead-capture wizard: step definitions,
//! per-step validation, the website type/platform catalog, and the shared
//! error type. No I/O lives here.

pub mod error;
pub mod types;
pub mod website;
pub mod wizard;
