use shopfront::config::SecurityConfig;
use shopfront::db::{NewReview, NewUser, ProductFields, Store};
use shopfront::services::{ReviewError, ReviewService, SeaOrmReviewService};

async fn test_store() -> Store {
    let path = std::env::temp_dir().join(format!("shopfront-store-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}?mode=rwc", path.display()))
        .await
        .expect("Failed to open test store")
}

fn cheap_hashing() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        ..SecurityConfig::default()
    }
}

async fn customer(store: &Store, username: &str) -> i32 {
    store
        .create_user(
            NewUser {
                first_name: "Test".to_string(),
                last_name: "Customer".to_string(),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "password123".to_string(),
            },
            &cheap_hashing(),
        )
        .await
        .unwrap()
        .id
}

fn fields(name: &str, slug: &str, category_id: i32, stock: i32) -> ProductFields {
    ProductFields {
        name: name.to_string(),
        slug: slug.to_string(),
        description: String::new(),
        price: 500,
        image_url: String::new(),
        stock,
        category_id,
    }
}

#[tokio::test]
async fn test_recompute_rating_without_reviews_is_zero() {
    let store = test_store().await;
    let category = store
        .create_category("Misc".to_string(), "misc".to_string(), None)
        .await
        .unwrap();
    let product = store
        .create_product(fields("Widget", "widget", category.id, 1), None)
        .await
        .unwrap();

    assert_eq!(store.recompute_rating(product.id).await.unwrap(), Some(0.0));
    assert_eq!(store.recompute_rating(product.id + 100).await.unwrap(), None);
}

#[tokio::test]
async fn test_rating_tracks_active_reviews_only() {
    let store = test_store().await;
    let category = store
        .create_category("Misc".to_string(), "misc".to_string(), None)
        .await
        .unwrap();
    let product = store
        .create_product(fields("Widget", "widget", category.id, 3), None)
        .await
        .unwrap();

    let ann = customer(&store, "ann").await;
    let ben = customer(&store, "ben").await;
    let cal = customer(&store, "cal").await;

    let mut reviews = Vec::new();
    for (user_id, grade) in [(ann, 5), (ben, 3), (cal, 1)] {
        let (review, _) = store
            .create_review(NewReview {
                user_id,
                product_id: product.id,
                comment: None,
                grade,
            })
            .await
            .unwrap();
        reviews.push(review);
    }

    let stored = store.get_product(product.id).await.unwrap().unwrap();
    assert!((stored.rating - 3.0).abs() < f64::EPSILON);

    let removed_id = reviews[0].id;
    let rating = store.deactivate_review(reviews.remove(0)).await.unwrap();
    assert!((rating - 2.0).abs() < f64::EPSILON);

    // Soft delete keeps the row
    let removed = store.get_review(removed_id).await.unwrap().unwrap();
    assert!(!removed.is_active);
    assert_eq!(store.list_product_reviews(product.id).await.unwrap().len(), 2);

    // Only the rating column changes
    let after = store.get_product(product.id).await.unwrap().unwrap();
    assert_eq!(after.name, stored.name);
    assert_eq!(after.stock, stored.stock);
    assert!((after.rating - 2.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_subcategory_ids_are_one_level_deep() {
    let store = test_store().await;
    let root = store
        .create_category("Root".to_string(), "root".to_string(), None)
        .await
        .unwrap();
    let child = store
        .create_category("Child".to_string(), "child".to_string(), Some(root.id))
        .await
        .unwrap();
    store
        .create_category("Grandchild".to_string(), "grandchild".to_string(), Some(child.id))
        .await
        .unwrap();

    assert_eq!(store.get_subcategory_ids(root.id).await.unwrap(), vec![child.id]);
}

#[tokio::test]
async fn test_deactivated_user_still_stored() {
    let store = test_store().await;
    let id = customer(&store, "gone").await;

    assert!(store.deactivate_user(id).await.unwrap());
    assert!(!store.deactivate_user(id + 100).await.unwrap());

    let user = store.get_user(id).await.unwrap().unwrap();
    assert!(!user.is_active);
    assert!(store.is_user_taken("gone", "other@example.com").await.unwrap());
}

#[tokio::test]
async fn test_soft_deleted_catalog_rows_are_kept() {
    let store = test_store().await;
    let category = store
        .create_category("Tools".to_string(), "tools".to_string(), None)
        .await
        .unwrap();
    let product = store
        .create_product(fields("Hammer", "hammer", category.id, 4), None)
        .await
        .unwrap();

    store.deactivate_product(product.clone()).await.unwrap();
    let stored = store.get_product(product.id).await.unwrap().unwrap();
    assert!(!stored.is_active);
    assert_eq!(stored.stock, 4);
    assert!(store.get_active_product_by_slug("hammer").await.unwrap().is_none());

    store.deactivate_category(category.clone()).await.unwrap();
    let stored = store.get_category_by_slug("tools").await.unwrap().unwrap();
    assert_eq!(stored.id, category.id);
    assert!(!stored.is_active);
    assert!(store.get_active_category_by_slug("tools").await.unwrap().is_none());
    assert!(store.list_active_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_review_service_recomputes_stored_rating() {
    let store = test_store().await;
    let category = store
        .create_category("Misc".to_string(), "misc".to_string(), None)
        .await
        .unwrap();
    let product = store
        .create_product(fields("Widget", "widget", category.id, 2), None)
        .await
        .unwrap();
    let dee = customer(&store, "dee").await;
    store
        .create_review(NewReview {
            user_id: dee,
            product_id: product.id,
            comment: Some("Solid".to_string()),
            grade: 4,
        })
        .await
        .unwrap();

    let service = SeaOrmReviewService::new(store.clone());
    let rating = service.recompute_rating(product.id).await.unwrap();
    assert!((rating - 4.0).abs() < f64::EPSILON);

    let stored = store.get_product(product.id).await.unwrap().unwrap();
    assert!((stored.rating - 4.0).abs() < f64::EPSILON);

    assert!(matches!(
        service.recompute_rating(product.id + 100).await,
        Err(ReviewError::ProductNotFound(_))
    ));
}
