//! Repository-level tests for portfolios: tri-state partial updates, gallery
//! array surgery, the published-only view counter, and the uniqueness
//! indexes that back subdomain reservation.

use folio_db::models::portfolio::{CreatePortfolio, ImageRef, UpdatePortfolio};
use folio_db::repositories::{PortfolioRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool) -> i64 {
    UserRepo::create(pool, "owner@example.com", None, "user")
        .await
        .unwrap()
        .id
}

fn new_portfolio(title: &str, subdomain: &str) -> CreatePortfolio {
    CreatePortfolio {
        title: title.to_string(),
        subdomain: subdomain.to_string(),
        subtitle: Some("Developer".to_string()),
        template_id: None,
        content: None,
    }
}

fn image(public_id: &str) -> ImageRef {
    ImageRef {
        url: format!("https://cdn.example.com/{public_id}"),
        public_id: public_id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Creation and uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_defaults_to_unpublished_draft(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let portfolio = PortfolioRepo::create(&pool, user_id, &new_portfolio("T", "jane"), "jane")
        .await
        .unwrap();

    assert!(!portfolio.is_published);
    assert_eq!(portfolio.view_count, 0);
    assert!(portfolio.section_order.is_empty());
    assert!(portfolio.gallery_images.0.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn subdomain_unique_index_is_case_insensitive(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    PortfolioRepo::create(&pool, user_id, &new_portfolio("A", "jane"), "jane")
        .await
        .unwrap();

    // The index is on lower(subdomain), so even a non-normalized write
    // cannot sneak a duplicate in.
    let result = PortfolioRepo::create(&pool, user_id, &new_portfolio("B", "JANE"), "JANE").await;
    let err = result.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_portfolios_subdomain"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Tri-state partial update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_distinguishes_absent_null_and_value(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let portfolio = PortfolioRepo::create(&pool, user_id, &new_portfolio("T", "jane"), "jane")
        .await
        .unwrap();

    // Absent subtitle: unchanged.
    let dto = UpdatePortfolio {
        title: Some("New".to_string()),
        ..Default::default()
    };
    let updated = PortfolioRepo::update(&pool, portfolio.id, &dto)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.subtitle.as_deref(), Some("Developer"));

    // Explicit null: cleared.
    let dto = UpdatePortfolio {
        subtitle: Some(None),
        ..Default::default()
    };
    let updated = PortfolioRepo::update(&pool, portfolio.id, &dto)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.subtitle, None);

    // New value: replaced.
    let dto = UpdatePortfolio {
        subtitle: Some(Some("Designer".to_string())),
        ..Default::default()
    };
    let updated = PortfolioRepo::update(&pool, portfolio.id, &dto)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.subtitle.as_deref(), Some("Designer"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_merges_content_at_the_section_level(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let mut dto = new_portfolio("T", "jane");
    dto.content = serde_json::json!({
        "about": { "heading": "Old", "body": "text" },
        "contact": { "email": "j@e.com" }
    })
    .as_object()
    .cloned();
    let portfolio = PortfolioRepo::create(&pool, user_id, &dto, "jane").await.unwrap();

    let patch = UpdatePortfolio {
        content: serde_json::json!({ "about": { "heading": "New" } })
            .as_object()
            .cloned(),
        ..Default::default()
    };
    let updated = PortfolioRepo::update(&pool, portfolio.id, &patch)
        .await
        .unwrap()
        .unwrap();

    // The provided section is replaced wholesale, the sibling survives.
    assert_eq!(updated.content["about"], serde_json::json!({ "heading": "New" }));
    assert_eq!(updated.content["contact"]["email"], "j@e.com");
}

// ---------------------------------------------------------------------------
// Published-only public read with view counting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_read_counts_views_and_hides_drafts(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let portfolio = PortfolioRepo::create(&pool, user_id, &new_portfolio("T", "jane"), "jane")
        .await
        .unwrap();

    // Draft: invisible.
    assert!(PortfolioRepo::public_read_by_subdomain(&pool, "jane")
        .await
        .unwrap()
        .is_none());

    PortfolioRepo::set_published(&pool, portfolio.id, true)
        .await
        .unwrap();

    // The read and the increment are one statement, so the returned row
    // already carries the bumped count.
    let first = PortfolioRepo::public_read_by_subdomain(&pool, "JANE")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.view_count, 1);

    let second = PortfolioRepo::public_read_by_subdomain(&pool, "jane")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.view_count, 2);
}

// ---------------------------------------------------------------------------
// Image slots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_removal_targets_exactly_one_entry(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let portfolio = PortfolioRepo::create(&pool, user_id, &new_portfolio("T", "jane"), "jane")
        .await
        .unwrap();

    for n in 1..=3 {
        PortfolioRepo::add_gallery_image(&pool, portfolio.id, &image(&format!("p/{n}")))
            .await
            .unwrap();
    }

    PortfolioRepo::remove_gallery_image(&pool, portfolio.id, "p/2")
        .await
        .unwrap();

    let current = PortfolioRepo::find_by_id(&pool, portfolio.id)
        .await
        .unwrap()
        .unwrap();
    let ids: Vec<&str> = current
        .gallery_images
        .iter()
        .map(|i| i.public_id.as_str())
        .collect();
    assert_eq!(ids, ["p/1", "p/3"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn removing_the_last_gallery_entry_leaves_an_empty_array(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let portfolio = PortfolioRepo::create(&pool, user_id, &new_portfolio("T", "jane"), "jane")
        .await
        .unwrap();

    PortfolioRepo::add_gallery_image(&pool, portfolio.id, &image("p/only"))
        .await
        .unwrap();
    PortfolioRepo::remove_gallery_image(&pool, portfolio.id, "p/only")
        .await
        .unwrap();

    let current = PortfolioRepo::find_by_id(&pool, portfolio.id)
        .await
        .unwrap()
        .unwrap();
    // jsonb_agg over zero rows is NULL; the COALESCE keeps the column an
    // empty array rather than NULL.
    assert!(current.gallery_images.0.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn header_slot_set_and_clear_round_trip(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let portfolio = PortfolioRepo::create(&pool, user_id, &new_portfolio("T", "jane"), "jane")
        .await
        .unwrap();

    assert!(PortfolioRepo::set_header_image(&pool, portfolio.id, &image("p/header"))
        .await
        .unwrap());

    let current = PortfolioRepo::find_by_id(&pool, portfolio.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.header_image.unwrap().0.public_id, "p/header");

    assert!(PortfolioRepo::clear_header_image(&pool, portfolio.id)
        .await
        .unwrap());
    let current = PortfolioRepo::find_by_id(&pool, portfolio.id)
        .await
        .unwrap()
        .unwrap();
    assert!(current.header_image.is_none());

    // Slot writes against a missing row report false, not an error.
    assert!(!PortfolioRepo::set_header_image(&pool, 999_999, &image("x"))
        .await
        .unwrap());
}
