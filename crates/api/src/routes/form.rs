//! Route definitions for the lead-capture wizard.
//!
//! Mounted at `/form` by the application router.
//!
//! ```text
//! GET    /                index (landing/result page, success banner)
//! GET    /step1           show_step1      POST /step1   store_step1
//! GET    /step2           show_step2      POST /step2   store_step2
//! GET    /step3           show_step3      POST /step3   store_step3
//! GET    /step4           show_step4 (review)
//! POST   /submit          submit
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::form;
use crate::state::AppState;

/// Wizard routes -- mounted at `/form`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form::index))
        .route("/step1", get(form::show_step1).post(form::store_step1))
        .route("/step2", get(form::show_step2).post(form::store_step2))
        .route("/step3", get(form::show_step3).post(form::store_step3))
        .route("/step4", get(form::show_step4))
        .route("/submit", post(form::submit))
}
