//! Repository for the `website_details` dimension table.

use leadflow_core::website::slugify;

use crate::models::website_detail::WebsiteDetail;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, type, name, slug, created_at, updated_at";

/// Provides lookup and idempotent creation for website details.
pub struct WebsiteDetailRepo;

impl WebsiteDetailRepo {
    /// Fetch the dimension row for a `(type, name)` pair, creating it if
    /// absent. The slug is derived from the platform name.
    ///
    /// Uses `ON CONFLICT` on `uq_website_details_type_name` so two
    /// concurrent first-time submissions converge on a single row instead
    /// of racing a separate lookup and insert. The `DO UPDATE` is a no-op
    /// rewrite of the slug, needed only so `RETURNING` yields the
    /// existing row.
    pub async fn find_or_create(
        executor: impl sqlx::PgExecutor<'_>,
        website_type: &str,
        name: &str,
    ) -> Result<WebsiteDetail, sqlx::Error> {
        let slug = slugify(name);
        let query = format!(
            "INSERT INTO website_details (type, name, slug) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (type, name) DO UPDATE SET slug = EXCLUDED.slug \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebsiteDetail>(&query)
            .bind(website_type)
            .bind(name)
            .bind(&slug)
            .fetch_one(executor)
            .await
    }

    /// Find a dimension row by its `(type, name)` pair.
    pub async fn find_by_type_and_name(
        executor: impl sqlx::PgExecutor<'_>,
        website_type: &str,
        name: &str,
    ) -> Result<Option<WebsiteDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM website_details WHERE type = $1 AND name = $2");
        sqlx::query_as::<_, WebsiteDetail>(&query)
            .bind(website_type)
            .bind(name)
            .fetch_optional(executor)
            .await
    }
}
