//! End-to-end tests for the lead-capture wizard, run against the full
//! router with a per-test database.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{body_json, build_test_app, location, TestClient};
use leadflow_db::models::lead::LEAD_PLACEHOLDER_PASSWORD;
use leadflow_db::repositories::{LeadRepo, WebsiteDetailRepo};

const VALID_STEP1: &str = "name=John+Doe&email=john%40example.com&company_name=Acme+Corp";

/// Walk steps 1-3 so the session is ready for review and submission.
async fn complete_wizard(client: &mut TestClient, website_type: &str, platform: &str) {
    let resp = client.post_form("/form/step1", VALID_STEP1).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step2");

    let resp = client
        .post_form("/form/step2", &format!("website_type={website_type}"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step3");

    let resp = client
        .post_form("/form/step3", &format!("platform={platform}"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step4");
}

async fn users_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn detail_count(pool: &PgPool, website_type: &str, name: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM website_details WHERE type = $1 AND name = $2")
        .bind(website_type)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Step pages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn step1_page_has_clean_props(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));

    let resp = client.get("/form/step1").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["data"]["step"], 1);
    assert_eq!(body["data"]["total_steps"], 4);
    assert_eq!(body["data"]["errors"], json!({}));
    assert_eq!(body["data"]["old"], json!({}));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn step2_page_lists_website_types(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));
    client.post_form("/form/step1", VALID_STEP1).await;

    let resp = client.get("/form/step2").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["data"]["step"], 2);
    let types = body["data"]["website_types"].as_array().unwrap();
    assert_eq!(types.len(), 5);
    assert!(types.iter().any(|t| t["value"] == "ecommerce"));
    assert!(types.iter().any(|t| t["label"] == "E-commerce"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn step3_page_lists_platforms_for_chosen_type(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));
    client.post_form("/form/step1", VALID_STEP1).await;
    client.post_form("/form/step2", "website_type=ecommerce").await;

    let resp = client.get("/form/step3").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["data"]["website_type"], "ecommerce");
    let platforms = body["data"]["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), 6);
    assert!(platforms.iter().any(|p| p["value"] == "shopify"));
    assert!(platforms.iter().all(|p| p["value"] != "wordpress"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn step4_review_shows_collected_data(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));
    complete_wizard(&mut client, "ecommerce", "shopify").await;

    let resp = client.get("/form/step4").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let form_data = &body["data"]["form_data"];
    assert_eq!(form_data["step1"]["name"], "John Doe");
    assert_eq!(form_data["step1"]["email"], "john@example.com");
    assert_eq!(form_data["step1"]["company_name"], "Acme Corp");
    assert_eq!(form_data["step2"]["website_type"], "ecommerce");
    assert_eq!(form_data["step3"]["platform"], "shopify");
}

// ---------------------------------------------------------------------------
// Prerequisite guards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn later_steps_redirect_without_prerequisites(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));

    for uri in ["/form/step2", "/form/step3", "/form/step4"] {
        let resp = client.get(uri).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(location(&resp), "/form/step1");

        // The redirect is idempotent; nothing accumulates in the session.
        let resp = client.get(uri).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/form/step1");
    }

    let resp = client.post_form("/form/submit", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn step3_requires_step2_even_after_step1(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));
    client.post_form("/form/step1", VALID_STEP1).await;

    let resp = client.get("/form/step3").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step1");

    let resp = client.post_form("/form/step3", "platform=shopify").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step1");
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn step1_invalid_input_flashes_errors_and_old(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));

    let resp = client
        .post_form("/form/step1", "name=Jo&email=not-an-email&company_name=Acme+Corp")
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step1");

    let body = body_json(client.get("/form/step1").await).await;
    assert_eq!(
        body["data"]["errors"]["name"][0],
        "The name must be at least 3 characters."
    );
    assert_eq!(
        body["data"]["errors"]["email"][0],
        "Please enter a valid email address."
    );
    assert_eq!(body["data"]["old"]["name"], "Jo");
    assert_eq!(body["data"]["old"]["email"], "not-an-email");

    // Flashes are one-shot: a second render comes up clean.
    let body = body_json(client.get("/form/step1").await).await;
    assert_eq!(body["data"]["errors"], json!({}));
    assert_eq!(body["data"]["old"], json!({}));

    // Invalid input never advances the wizard.
    let resp = client.get("/form/step2").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn step2_rejects_unknown_website_type(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));
    client.post_form("/form/step1", VALID_STEP1).await;

    let resp = client.post_form("/form/step2", "website_type=saas").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step2");

    let body = body_json(client.get("/form/step2").await).await;
    assert_eq!(
        body["data"]["errors"]["website_type"][0],
        "Please select a valid website type."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn step2_accepts_each_website_type(pool: PgPool) {
    for website_type in ["ecommerce", "blog", "corporate", "portfolio", "other"] {
        let mut client = TestClient::new(build_test_app(pool.clone()));
        client.post_form("/form/step1", VALID_STEP1).await;

        let resp = client
            .post_form("/form/step2", &format!("website_type={website_type}"))
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{website_type}");
        assert_eq!(location(&resp), "/form/step3");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn step3_rejects_platform_from_other_type(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool));
    client.post_form("/form/step1", VALID_STEP1).await;
    client.post_form("/form/step2", "website_type=ecommerce").await;

    // wordpress belongs to the non-ecommerce set.
    let resp = client.post_form("/form/step3", "platform=wordpress").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step3");

    let body = body_json(client.get("/form/step3").await).await;
    assert_eq!(
        body["data"]["errors"]["platform"][0],
        "Please select a valid platform."
    );

    let resp = client.post_form("/form/step3", "platform=shopify").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step4");
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn happy_path_submission_persists_lead(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool.clone()));
    complete_wizard(&mut client, "ecommerce", "shopify").await;

    let resp = client.post_form("/form/submit", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form");

    // Success banner flashes once; the notifier is unconfigured so the
    // notification suffix is absent.
    let body = body_json(client.get("/form").await).await;
    let success = body["data"]["success"].as_str().unwrap();
    assert!(success.contains("submitted successfully"));
    assert!(!success.contains("Notification sent to team."));

    let body = body_json(client.get("/form").await).await;
    assert!(body["data"]["success"].is_null());

    // One lead, linked to the seeded (ecommerce, Shopify) detail row.
    assert_eq!(users_count(&pool).await, 1);
    let lead = LeadRepo::find_by_email(&pool, "john@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.name, "John Doe");
    assert_eq!(lead.company_name, "Acme Corp");
    assert_eq!(lead.password, LEAD_PLACEHOLDER_PASSWORD);

    let detail = WebsiteDetailRepo::find_by_type_and_name(&pool, "ecommerce", "shopify")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.website_detail_id, detail.id);
    assert_eq!(detail_count(&pool, "ecommerce", "shopify").await, 1);

    // The wizard state was cleared: review now redirects to step 1.
    let resp = client.get("/form/step4").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submission_creates_unseeded_detail_once(pool: PgPool) {
    let mut client = TestClient::new(build_test_app(pool.clone()));
    complete_wizard(&mut client, "blog", "webflow").await;

    assert_eq!(detail_count(&pool, "blog", "webflow").await, 0);

    let resp = client.post_form("/form/submit", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form");

    assert_eq!(detail_count(&pool, "blog", "webflow").await, 1);

    // A second lead with the same pair converges on the same row.
    let mut second = TestClient::new(build_test_app(pool.clone()));
    second
        .post_form(
            "/form/step1",
            "name=Jane+Roe&email=jane%40example.com&company_name=Roe+Media",
        )
        .await;
    second.post_form("/form/step2", "website_type=blog").await;
    second.post_form("/form/step3", "platform=webflow").await;
    second.post_form("/form/submit", "").await;

    assert_eq!(detail_count(&pool, "blog", "webflow").await, 1);
    assert_eq!(users_count(&pool).await, 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_email_rejected_before_persisting(pool: PgPool) {
    let mut first = TestClient::new(build_test_app(pool.clone()));
    complete_wizard(&mut first, "ecommerce", "shopify").await;
    first.post_form("/form/submit", "").await;
    assert_eq!(users_count(&pool).await, 1);

    // Same email through a fresh session.
    let mut second = TestClient::new(build_test_app(pool.clone()));
    complete_wizard(&mut second, "blog", "wordpress").await;

    let resp = second.post_form("/form/submit", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/form/step1");

    let body = body_json(second.get("/form/step1").await).await;
    let email_error = body["data"]["errors"]["email"][0].as_str().unwrap();
    assert!(email_error.contains("already exists"));
    assert_eq!(body["data"]["old"]["email"], "john@example.com");

    assert_eq!(users_count(&pool).await, 1);
}
