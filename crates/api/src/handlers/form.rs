//! Handlers for the four-step lead-capture wizard.
//!
//! Step GETs return the page props (step position, choice lists, flashed
//! errors and old input); step POSTs validate, persist to the session,
//! and redirect forward. Missing prerequisite state always redirects back
//! to step 1 -- a restart, not an error. The final submission runs the
//! persistence transaction and a single best-effort notification.

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use leadflow_core::website::{platform_choices, ALL_WEBSITE_TYPES};
use leadflow_core::wizard::{
    field_error, validate_step1, validate_step2, validate_step3, CompleteSubmission, FieldErrors,
    Step1Input, Step2Input, Step3Input, WizardStep, TOTAL_STEPS,
};
use leadflow_db::models::lead::{CreateLead, Lead};
use leadflow_db::repositories::{LeadRepo, WebsiteDetailRepo};
use leadflow_db::DbPool;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::session::WizardSession;
use crate::state::AppState;

/// Success banner shown after a completed submission.
const SUCCESS_MESSAGE: &str =
    "Your information has been submitted successfully! We will contact you soon.";

/// Appended to the success banner only when the team notification went out.
const NOTIFIED_SUFFIX: &str = " Notification sent to team.";

const DUPLICATE_EMAIL_MESSAGE: &str = "An account with this email address already exists. \
     Please use a different email or contact support if you need assistance.";

const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong while processing your submission. \
     Please try again or contact support if the problem persists.";

/// Push notification body for a new lead.
const LEAD_NOTIFICATION_MESSAGE: &str = "A new user has submitted the registration form";

// ---------------------------------------------------------------------------
// Page payloads
// ---------------------------------------------------------------------------

/// A selectable `(value, label)` choice offered on steps 2 and 3.
#[derive(Debug, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexPage {
    /// One-shot success banner from a completed submission.
    pub success: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Step1Page {
    pub step: u8,
    pub total_steps: u8,
    pub errors: FieldErrors,
    /// Previously-typed input echoed after a validation failure.
    pub old: Value,
}

#[derive(Debug, Serialize)]
pub struct Step2Page {
    pub step: u8,
    pub total_steps: u8,
    pub errors: FieldErrors,
    pub website_types: Vec<Choice>,
}

#[derive(Debug, Serialize)]
pub struct Step3Page {
    pub step: u8,
    pub total_steps: u8,
    pub errors: FieldErrors,
    pub website_type: &'static str,
    pub platforms: Vec<Choice>,
}

#[derive(Debug, Serialize)]
pub struct Step4Page {
    pub step: u8,
    pub total_steps: u8,
    pub form_data: CompleteSubmission,
}

fn choices(pairs: &'static [(&'static str, &'static str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|(value, label)| Choice { value, label })
        .collect()
}

fn restart() -> Response {
    Redirect::to("/form/step1").into_response()
}

// ---------------------------------------------------------------------------
// GET /form
// ---------------------------------------------------------------------------

/// Landing/result page with the optional one-shot success banner.
pub async fn index(session: WizardSession) -> AppResult<impl IntoResponse> {
    let success = session.take_success().await?;
    Ok(Json(DataResponse {
        data: IndexPage { success },
    }))
}

// ---------------------------------------------------------------------------
// GET /form/step1
// ---------------------------------------------------------------------------

/// Step 1 page: basic information, plus any flashed errors and old input.
pub async fn show_step1(session: WizardSession) -> AppResult<impl IntoResponse> {
    let errors = session.take_errors().await?;
    let old = session.take_old().await?;
    Ok(Json(DataResponse {
        data: Step1Page {
            step: 1,
            total_steps: TOTAL_STEPS,
            errors,
            old,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /form/step1
// ---------------------------------------------------------------------------

/// Validate and store step-1 data, advancing to step 2.
///
/// On validation failure the wizard state is untouched; the errors and
/// the typed input are flashed for the step-1 re-render.
pub async fn store_step1(
    session: WizardSession,
    Form(input): Form<Step1Input>,
) -> AppResult<Response> {
    match validate_step1(&input) {
        Ok(data) => {
            let mut state = session.state().await?;
            state.step1 = Some(data);
            session.save_state(&state).await?;
            Ok(Redirect::to("/form/step2").into_response())
        }
        Err(errors) => {
            session.flash_errors(&errors).await?;
            session.flash_old(&input).await?;
            Ok(restart())
        }
    }
}

// ---------------------------------------------------------------------------
// GET /form/step2
// ---------------------------------------------------------------------------

/// Step 2 page: website type choices. Requires step 1.
pub async fn show_step2(session: WizardSession) -> AppResult<Response> {
    let state = session.state().await?;
    if !state.ready_for(WizardStep::WebsiteType) {
        return Ok(restart());
    }

    let errors = session.take_errors().await?;
    Ok(Json(DataResponse {
        data: Step2Page {
            step: 2,
            total_steps: TOTAL_STEPS,
            errors,
            website_types: ALL_WEBSITE_TYPES
                .iter()
                .map(|t| Choice {
                    value: t.as_str(),
                    label: t.label(),
                })
                .collect(),
        },
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// POST /form/step2
// ---------------------------------------------------------------------------

/// Validate and store the website type, advancing to step 3.
pub async fn store_step2(
    session: WizardSession,
    Form(input): Form<Step2Input>,
) -> AppResult<Response> {
    let mut state = session.state().await?;
    if !state.ready_for(WizardStep::WebsiteType) {
        return Ok(restart());
    }

    match validate_step2(&input) {
        Ok(data) => {
            state.step2 = Some(data);
            session.save_state(&state).await?;
            Ok(Redirect::to("/form/step3").into_response())
        }
        Err(errors) => {
            session.flash_errors(&errors).await?;
            Ok(Redirect::to("/form/step2").into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// GET /form/step3
// ---------------------------------------------------------------------------

/// Step 3 page: platform choices for the chosen website type.
/// Requires steps 1-2.
pub async fn show_step3(session: WizardSession) -> AppResult<Response> {
    let state = session.state().await?;
    if !state.ready_for(WizardStep::Platform) {
        return Ok(restart());
    }
    let Some(step2) = state.step2 else {
        return Ok(restart());
    };

    let errors = session.take_errors().await?;
    Ok(Json(DataResponse {
        data: Step3Page {
            step: 3,
            total_steps: TOTAL_STEPS,
            errors,
            website_type: step2.website_type.as_str(),
            platforms: choices(platform_choices(step2.website_type)),
        },
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// POST /form/step3
// ---------------------------------------------------------------------------

/// Validate and store the platform, advancing to the review step.
///
/// The accepted platform set depends on the website type chosen on
/// step 2; a platform from the other set is rejected outright.
pub async fn store_step3(
    session: WizardSession,
    Form(input): Form<Step3Input>,
) -> AppResult<Response> {
    let mut state = session.state().await?;
    if !state.ready_for(WizardStep::Platform) {
        return Ok(restart());
    }
    let Some(step2) = state.step2 else {
        return Ok(restart());
    };

    match validate_step3(step2.website_type, &input) {
        Ok(data) => {
            state.step3 = Some(data);
            session.save_state(&state).await?;
            Ok(Redirect::to("/form/step4").into_response())
        }
        Err(errors) => {
            session.flash_errors(&errors).await?;
            Ok(Redirect::to("/form/step3").into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// GET /form/step4
// ---------------------------------------------------------------------------

/// Review page: the union of all collected step data. Requires steps 1-3.
/// Pure read; performs no validation.
pub async fn show_step4(session: WizardSession) -> AppResult<Response> {
    let state = session.state().await?;
    let Some(form_data) = state.complete() else {
        return Ok(restart());
    };

    Ok(Json(DataResponse {
        data: Step4Page {
            step: 4,
            total_steps: TOTAL_STEPS,
            form_data,
        },
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// POST /form/submit
// ---------------------------------------------------------------------------

/// Final submission: duplicate-email check, persistence transaction,
/// best-effort notification, session cleanup.
///
/// Every failure is converted into a flash-and-redirect outcome; nothing
/// escapes to the browser as an unhandled fault.
pub async fn submit(State(app): State<AppState>, session: WizardSession) -> AppResult<Response> {
    let state = session.state().await?;
    let Some(submission) = state.complete() else {
        return Ok(restart());
    };

    // Duplicate check first so the user gets a field-level error with
    // their input echoed back, not a constraint violation.
    match LeadRepo::find_by_email(&app.pool, &submission.step1.email).await {
        Ok(Some(_)) => {
            session
                .flash_errors(&field_error("email", DUPLICATE_EMAIL_MESSAGE))
                .await?;
            session.flash_old(&submission.step1).await?;
            return Ok(restart());
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Duplicate-email lookup failed");
            return fail_submission(&session, &submission).await;
        }
    }

    let lead = match persist_submission(&app.pool, &submission).await {
        Ok(lead) => lead,
        Err(e) => {
            tracing::error!(error = %e, "Lead submission failed");
            return fail_submission(&session, &submission).await;
        }
    };

    let outcome = app
        .notifier
        .send_to_all(
            LEAD_NOTIFICATION_MESSAGE,
            json!({
                "user_id": lead.id,
                "user_name": lead.name,
                "user_email": lead.email,
                "company_name": lead.company_name,
                "website_type": submission.step2.website_type.as_str(),
                "platform": submission.step3.platform,
                "submitted_at": chrono::Utc::now().to_rfc3339(),
            }),
        )
        .await;

    session.clear_state().await?;

    let mut success = SUCCESS_MESSAGE.to_string();
    if outcome.success {
        success.push_str(NOTIFIED_SUFFIX);
    } else {
        // Notification failure never fails the submission.
        tracing::warn!(error = outcome.error.as_deref(), "Lead notification failed");
    }
    session.flash_success(&success).await?;

    tracing::info!(
        lead_id = lead.id,
        website_detail_id = lead.website_detail_id,
        notified = outcome.success,
        "Lead submitted"
    );

    Ok(Redirect::to("/form").into_response())
}

/// Create the website-detail dimension row (if absent) and the lead, in
/// one transaction: any failure leaves nothing persisted.
async fn persist_submission(
    pool: &DbPool,
    submission: &CompleteSubmission,
) -> Result<Lead, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let detail = WebsiteDetailRepo::find_or_create(
        &mut *tx,
        submission.step2.website_type.as_str(),
        &submission.step3.platform,
    )
    .await?;

    let lead = LeadRepo::create(
        &mut *tx,
        &CreateLead {
            name: submission.step1.name.clone(),
            email: submission.step1.email.clone(),
            company_name: submission.step1.company_name.clone(),
            website_url: submission.step1.website_url.clone(),
            website_detail_id: detail.id,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(lead)
}

/// Flash the generic failure message (detail stays in the logs) with the
/// step-1 input echoed, and restart at step 1.
async fn fail_submission(
    session: &WizardSession,
    submission: &CompleteSubmission,
) -> AppResult<Response> {
    session
        .flash_errors(&field_error("general", GENERIC_FAILURE_MESSAGE))
        .await?;
    session.flash_old(&submission.step1).await?;
    Ok(restart())
}
