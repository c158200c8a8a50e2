//! Repository for the `users` (lead) table.

use leadflow_core::types::DbId;

use crate::models::lead::{CreateLead, Lead, LEAD_PLACEHOLDER_PASSWORD};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, company_name, website_url, password, \
                        website_detail_id, created_at, updated_at";

/// Provides create and lookup operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead, returning the created row.
    ///
    /// Every lead gets the fixed placeholder password; no per-lead
    /// credential exists. Takes an executor so the caller can run this
    /// inside the submission transaction.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateLead,
    ) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, company_name, website_url, password, website_detail_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company_name)
            .bind(&input.website_url)
            .bind(LEAD_PLACEHOLDER_PASSWORD)
            .bind(input.website_detail_id)
            .fetch_one(executor)
            .await
    }

    /// Find a lead by email (case-sensitive).
    pub async fn find_by_email(
        executor: impl sqlx::PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// List leads linked to a website detail, newest first.
    pub async fn list_by_website_detail(
        executor: impl sqlx::PgExecutor<'_>,
        website_detail_id: DbId,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE website_detail_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(website_detail_id)
            .fetch_all(executor)
            .await
    }
}
