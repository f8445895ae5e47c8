// Category service behavior over an in-memory store

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use dscatalog::categories::{Category, CategoryFilter, CategoryService};
use dscatalog::core::pagination::PageRequest;
use dscatalog::core::AppError;
use helpers::{InMemoryStore, TestDataFactory};

fn fixture() -> (Arc<InMemoryStore<Category>>, CategoryService) {
    let store = Arc::new(InMemoryStore::with_rows(vec![
        TestDataFactory::create_category(1, "Books"),
        TestDataFactory::create_category(2, "Electronics"),
        TestDataFactory::create_category(3, "Computers"),
    ]));
    // Products are still linked to Electronics
    store.mark_referenced(2);

    let service = CategoryService::new(store.clone());
    (store, service)
}

#[tokio::test]
async fn test_find_by_id_returns_category() {
    let (_, service) = fixture();

    let dto = service.find_by_id(3).await.unwrap();

    assert_eq!(dto.id, Some(3));
    assert_eq!(dto.name, "Computers");
}

#[tokio::test]
async fn test_find_by_id_non_existing_is_not_found() {
    let (_, service) = fixture();

    let err = service.find_by_id(1000).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound { entity: "Category", id: 1000 }));
}

#[tokio::test]
async fn test_find_all_paged_filters_by_name() {
    let (_, service) = fixture();
    let filter = CategoryFilter {
        name: Some("COMP".to_string()),
    };

    let page = service.find_all_paged(&filter, &PageRequest::of(0, 12)).await.unwrap();

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].name, "Computers");
}

#[tokio::test]
async fn test_insert_assigns_new_id() {
    let (store, service) = fixture();

    let created = service
        .insert(TestDataFactory::create_category_dto("Garden"))
        .await
        .unwrap();

    assert_eq!(created.id, Some(4));
    assert_eq!(store.get(4).unwrap().name, "Garden");
}

#[tokio::test]
async fn test_update_existing_id() {
    let (store, service) = fixture();

    let updated = service
        .update(1, TestDataFactory::create_category_dto("Used Books"))
        .await
        .unwrap();

    assert_eq!(updated.id, Some(1));
    assert_eq!(store.get(1).unwrap().name, "Used Books");
}

#[tokio::test]
async fn test_update_non_existing_id_does_not_create() {
    let (store, service) = fixture();

    let err = service
        .update(1000, TestDataFactory::create_category_dto("Ghost"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound { .. }));
    assert_eq!(store.save_calls(), 0);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_delete_outcomes() {
    let (store, service) = fixture();

    service.delete(1).await.unwrap();
    assert!(store.get(1).is_none());

    let absent = service.delete(1000).await.unwrap_err();
    assert!(matches!(absent, AppError::NotFound { id: 1000, .. }));

    let linked = service.delete(2).await.unwrap_err();
    assert!(matches!(linked, AppError::ReferentialConflict { entity: "Category", id: 2 }));

    assert_eq!(store.delete_calls(), 3);
}
