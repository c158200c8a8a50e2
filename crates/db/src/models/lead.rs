//! Lead (user) model and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use leadflow_core::types::{DbId, Timestamp};

/// Fixed placeholder credential stored on every created lead.
///
/// Leads have no self-service login, so no real authentication material
/// is issued; the column is populated with this constant to satisfy the
/// NOT NULL schema carried over from the user table.
pub const LEAD_PLACEHOLDER_PASSWORD: &str = "12345678";

/// A row from the `users` table: a prospective-customer record captured
/// by the wizard. Created once at submission time, never mutated by this
/// subsystem.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub website_url: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    pub website_detail_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lead at final submission.
#[derive(Debug, Clone)]
pub struct CreateLead {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub website_url: Option<String>,
    pub website_detail_id: DbId,
}
