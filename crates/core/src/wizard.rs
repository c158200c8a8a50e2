//! Lead-capture wizard steps, state, and per-step validation.
//!
//! The wizard collects lead data across four sequential steps. Cross-step
//! state is the typed [`WizardState`] struct (one optional slot per data
//! step) rather than a free-form key/value bag, so "step N requires steps
//! 1..N-1" is checked against typed fields and a full submission is only
//! obtainable as a [`CompleteSubmission`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::website::{is_valid_platform, WebsiteType};

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The four steps in the lead-capture wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Contact,
    WebsiteType,
    Platform,
    Review,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 4;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Contact),
            2 => Some(Self::WebsiteType),
            3 => Some(Self::Platform),
            4 => Some(Self::Review),
            _ => None,
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Contact => 1,
            Self::WebsiteType => 2,
            Self::Platform => 3,
            Self::Review => 4,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Contact => "Basic Information",
            Self::WebsiteType => "Website Details",
            Self::Platform => "Platform Selection",
            Self::Review => "Review & Submit",
        }
    }
}

// ---------------------------------------------------------------------------
// Field errors
// ---------------------------------------------------------------------------

/// Per-field validation messages, keyed by form field name.
///
/// `BTreeMap` keeps field order deterministic in responses and tests.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Build a `FieldErrors` carrying a single message for one field.
pub fn field_error(field: &str, message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.to_string()]);
    errors
}

/// Flatten `validator` output into [`FieldErrors`], preferring the
/// per-rule custom message and falling back to the rule code.
fn collect_validator_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        out.insert(field.to_string(), messages);
    }
    out
}

// ---------------------------------------------------------------------------
// Step 1 -- basic information
// ---------------------------------------------------------------------------

/// Raw step-1 form submission.
///
/// All fields are optional at the wire level so missing inputs surface as
/// per-field "required" messages instead of a deserialization failure.
/// Serializable so a failed submission can be echoed back as "old" input.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Step1Input {
    #[validate(
        required(message = "The name field is required."),
        length(min = 3, max = 255, message = "The name must be at least 3 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "The email field is required."),
        email(message = "Please enter a valid email address."),
        length(max = 255, message = "The email may not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "The company name field is required."),
        length(
            min = 3,
            max = 255,
            message = "The company name must be at least 3 characters."
        )
    )]
    pub company_name: Option<String>,

    #[validate(
        url(message = "Please enter a valid URL."),
        length(max = 255, message = "The website url may not be greater than 255 characters.")
    )]
    pub website_url: Option<String>,
}

/// Validated step-1 data as stored in the session and persisted at submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step1Data {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub website_url: Option<String>,
}

/// Validate a step-1 submission.
///
/// Whitespace is trimmed before validation and an empty `website_url` is
/// treated as absent. On failure the wizard state must not change; only
/// the validated fields ever reach the session.
pub fn validate_step1(input: &Step1Input) -> Result<Step1Data, FieldErrors> {
    let normalized = Step1Input {
        name: normalize_field(&input.name),
        email: normalize_field(&input.email),
        company_name: normalize_field(&input.company_name),
        website_url: normalize_field(&input.website_url),
    };

    normalized.validate().map_err(|e| collect_validator_errors(&e))?;

    match (normalized.name, normalized.email, normalized.company_name) {
        (Some(name), Some(email), Some(company_name)) => Ok(Step1Data {
            name,
            email,
            company_name,
            website_url: normalized.website_url,
        }),
        // Unreachable while the `required` rules above are in place.
        _ => Err(field_error("name", "The name field is required.")),
    }
}

/// Trim a field, mapping empty or missing input to `None`.
fn normalize_field(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Step 2 -- website type
// ---------------------------------------------------------------------------

/// Raw step-2 form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step2Input {
    pub website_type: Option<String>,
}

/// Validated step-2 data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step2Data {
    pub website_type: WebsiteType,
}

/// Validate a step-2 submission against the fixed website type enum.
pub fn validate_step2(input: &Step2Input) -> Result<Step2Data, FieldErrors> {
    let value = match normalize_field(&input.website_type) {
        Some(v) => v,
        None => return Err(field_error("website_type", "Please select a website type.")),
    };

    match WebsiteType::from_str_db(&value) {
        Ok(website_type) => Ok(Step2Data { website_type }),
        Err(_) => Err(field_error(
            "website_type",
            "Please select a valid website type.",
        )),
    }
}

// ---------------------------------------------------------------------------
// Step 3 -- platform
// ---------------------------------------------------------------------------

/// Raw step-3 form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step3Input {
    pub platform: Option<String>,
}

/// Validated step-3 data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step3Data {
    pub platform: String,
}

/// Validate a step-3 submission against the platform set for the website
/// type chosen on step 2. A platform valid only for a different type is
/// an error, not a silent correction.
pub fn validate_step3(
    website_type: WebsiteType,
    input: &Step3Input,
) -> Result<Step3Data, FieldErrors> {
    let platform = match normalize_field(&input.platform) {
        Some(v) => v,
        None => return Err(field_error("platform", "Please select a platform.")),
    };

    if !is_valid_platform(website_type, &platform) {
        return Err(field_error("platform", "Please select a valid platform."));
    }

    Ok(Step3Data { platform })
}

// ---------------------------------------------------------------------------
// Wizard state
// ---------------------------------------------------------------------------

/// Cross-step wizard state held in the browser session.
///
/// Step N's slot is populated only after steps 1..N-1 validated; the
/// handlers enforce this by redirecting to step 1 when [`ready_for`]
/// reports a missing prerequisite.
///
/// [`ready_for`]: WizardState::ready_for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub step1: Option<Step1Data>,
    pub step2: Option<Step2Data>,
    pub step3: Option<Step3Data>,
}

/// The union of all step data, obtainable only from a fully-populated
/// [`WizardState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteSubmission {
    pub step1: Step1Data,
    pub step2: Step2Data,
    pub step3: Step3Data,
}

impl WizardState {
    /// Whether all prerequisite steps for `step` have been completed.
    ///
    /// Step 1 has no prerequisites; step 4 (review) requires steps 1-3.
    pub fn ready_for(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Contact => true,
            WizardStep::WebsiteType => self.step1.is_some(),
            WizardStep::Platform => self.step1.is_some() && self.step2.is_some(),
            WizardStep::Review => {
                self.step1.is_some() && self.step2.is_some() && self.step3.is_some()
            }
        }
    }

    /// Assemble the full submission, or `None` while any step is missing.
    pub fn complete(&self) -> Option<CompleteSubmission> {
        Some(CompleteSubmission {
            step1: self.step1.clone()?,
            step2: self.step2?,
            step3: self.step3.clone()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
