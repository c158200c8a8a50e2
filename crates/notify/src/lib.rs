//! Best-effort push notifications via the OneSignal REST API.
//!
//! Failure here must never fail the caller's primary operation, so the
//! public surface returns a [`NotificationOutcome`] value instead of a
//! `Result` -- missing configuration, non-2xx responses, and transport
//! errors all come back as `success: false` with a reason, already
//! logged.

mod onesignal;

pub use onesignal::{NotificationOutcome, OneSignalClient, OneSignalConfig};
