//! Website detail dimension model.

use serde::Serialize;
use sqlx::FromRow;

use leadflow_core::types::{DbId, Timestamp};

/// A row from the `website_details` table: the normalized
/// `(type, platform)` dimension that leads link to.
///
/// At most one row exists per `(type, name)` pair, enforced by the
/// `uq_website_details_type_name` constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebsiteDetail {
    pub id: DbId,
    /// Website type value (`ecommerce`, `blog`, ...).
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub website_type: String,
    /// Platform value (`shopify`, `wordpress`, ...).
    pub name: String,
    /// URL-safe form of `name`.
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
