//! Typed access to the wizard's browser-session state.
//!
//! The session service itself is the tower-sessions collaborator wired
//! into the router; this module is the only place that touches its keys,
//! so handlers work with [`WizardState`] and one-shot flash values
//! instead of a free-form key/value bag.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use serde_json::Value;
use tower_sessions::Session;

use leadflow_core::wizard::{FieldErrors, WizardState};

use crate::error::{AppError, AppResult};

/// Session key holding the typed wizard state.
const WIZARD_STATE_KEY: &str = "wizard.state";

/// Flash key for per-field validation messages (consumed on next read).
const FLASH_ERRORS_KEY: &str = "flash.errors";

/// Flash key for echoed "old" form input (consumed on next read).
const FLASH_OLD_KEY: &str = "flash.old";

/// Flash key for the post-submission success banner (consumed on next read).
const FLASH_SUCCESS_KEY: &str = "flash.success";

/// Extractor wrapping the request's [`Session`] with wizard-shaped accessors.
pub struct WizardSession {
    inner: Session,
}

impl WizardSession {
    /// Load the wizard state, defaulting to an empty wizard for new sessions.
    pub async fn state(&self) -> AppResult<WizardState> {
        Ok(self
            .inner
            .get::<WizardState>(WIZARD_STATE_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Persist the wizard state.
    pub async fn save_state(&self, state: &WizardState) -> AppResult<()> {
        self.inner.insert(WIZARD_STATE_KEY, state).await?;
        Ok(())
    }

    /// Drop all wizard state, leaving the session (and any flash values) alive.
    pub async fn clear_state(&self) -> AppResult<()> {
        self.inner.remove::<WizardState>(WIZARD_STATE_KEY).await?;
        Ok(())
    }

    /// Flash per-field validation messages for the next page render.
    pub async fn flash_errors(&self, errors: &FieldErrors) -> AppResult<()> {
        self.inner.insert(FLASH_ERRORS_KEY, errors).await?;
        Ok(())
    }

    /// Take and clear flashed field errors.
    pub async fn take_errors(&self) -> AppResult<FieldErrors> {
        Ok(self
            .inner
            .remove::<FieldErrors>(FLASH_ERRORS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Flash submitted form input so the next render can re-populate fields.
    pub async fn flash_old(&self, old: &impl Serialize) -> AppResult<()> {
        let value = serde_json::to_value(old)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize old input: {e}")))?;
        self.inner.insert(FLASH_OLD_KEY, value).await?;
        Ok(())
    }

    /// Take and clear flashed old input, defaulting to an empty object.
    pub async fn take_old(&self) -> AppResult<Value> {
        Ok(self
            .inner
            .remove::<Value>(FLASH_OLD_KEY)
            .await?
            .unwrap_or_else(|| Value::Object(Default::default())))
    }

    /// Flash the post-submission success banner.
    pub async fn flash_success(&self, message: &str) -> AppResult<()> {
        self.inner.insert(FLASH_SUCCESS_KEY, message).await?;
        Ok(())
    }

    /// Take and clear the success banner.
    pub async fn take_success(&self) -> AppResult<Option<String>> {
        Ok(self.inner.remove::<String>(FLASH_SUCCESS_KEY).await?)
    }
}

impl<S> FromRequestParts<S> for WizardSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state)
            .await
            .map(|inner| Self { inner })
    }
}
