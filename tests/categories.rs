use sqlx::PgPool;

use campus_activity_server::domain::categories;
use campus_activity_server::models::category::{CategoryInput, CategoryPatch};
use campus_activity_server::utils::error::AppError;

fn input(name: &str) -> CategoryInput {
    CategoryInput {
        name: name.to_string(),
        description: format!("{name} events"),
        icon: "star".to_string(),
    }
}

#[sqlx::test]
async fn category_names_are_unique(pool: PgPool) {
    categories::create(&pool, input("Sports"))
        .await
        .expect("creation should succeed");

    let err = categories::create(&pool, input("Sports"))
        .await
        .expect_err("duplicate name should fail");
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[sqlx::test]
async fn listing_is_ordered_by_name(pool: PgPool) {
    categories::create(&pool, input("Music")).await.unwrap();
    categories::create(&pool, input("Arts")).await.unwrap();
    categories::create(&pool, input("Sports")).await.unwrap();

    let names: Vec<String> = categories::list(&pool)
        .await
        .expect("listing should succeed")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Arts", "Music", "Sports"]);
}

#[sqlx::test]
async fn patch_only_touches_provided_fields(pool: PgPool) {
    let category = categories::create(&pool, input("Tech")).await.unwrap();

    let patched = categories::patch(
        &pool,
        category.id,
        CategoryPatch {
            name: None,
            description: Some("All things technical".to_string()),
            icon: None,
        },
    )
    .await
    .expect("patch should succeed");

    assert_eq!(patched.name, "Tech");
    assert_eq!(patched.description, "All things technical");
    assert_eq!(patched.icon, "star");
}

#[sqlx::test]
async fn full_update_replaces_every_field(pool: PgPool) {
    let category = categories::create(&pool, input("Tech")).await.unwrap();

    let updated = categories::update(
        &pool,
        category.id,
        CategoryInput {
            name: "Technology".to_string(),
            description: String::new(),
            icon: String::new(),
        },
    )
    .await
    .expect("update should succeed");

    assert_eq!(updated.name, "Technology");
    assert_eq!(updated.description, "");
    assert_eq!(updated.icon, "");
}

#[sqlx::test]
async fn deleted_categories_are_gone(pool: PgPool) {
    let category = categories::create(&pool, input("Ephemeral")).await.unwrap();

    categories::delete(&pool, category.id)
        .await
        .expect("deletion should succeed");

    let err = categories::fetch(&pool, category.id)
        .await
        .expect_err("fetch should fail");
    assert!(matches!(err, AppError::NotFound(_)));

    let err = categories::delete(&pool, category.id)
        .await
        .expect_err("second deletion should fail");
    assert!(matches!(err, AppError::NotFound(_)));
}
