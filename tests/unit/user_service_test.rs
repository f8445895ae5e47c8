// User service behavior: email uniqueness, password encoding and role wiring

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use dscatalog::core::pagination::PageRequest;
use dscatalog::core::{AppError, StoreError};
use dscatalog::roles::Role;
use dscatalog::users::{User, UserFilter, UserService};
use helpers::{InMemoryStore, PlainTextEncoder, TestDataFactory};

struct Fixture {
    users: Arc<InMemoryStore<User>>,
    service: UserService,
}

fn fixture() -> Fixture {
    let users = Arc::new(InMemoryStore::with_rows(vec![
        TestDataFactory::create_user(1, "maria@gmail.com"),
        TestDataFactory::create_user(2, "bob@gmail.com"),
    ]));
    let roles: Arc<InMemoryStore<Role>> = Arc::new(InMemoryStore::with_rows(vec![
        TestDataFactory::create_role(1, "ROLE_OPERATOR"),
        TestDataFactory::create_role(2, "ROLE_ADMIN"),
    ]));

    let service = UserService::new(users.clone(), roles, Arc::new(PlainTextEncoder));
    Fixture { users, service }
}

fn assert_email_error(err: AppError) {
    match err {
        AppError::Validation(validation) => {
            assert!(validation.has_field("email"), "errors: {:?}", validation.errors)
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_insert_encodes_password_and_resolves_roles() {
    let f = fixture();
    let dto = TestDataFactory::create_user_insert_dto("alex@gmail.com", &[2, 2]);

    let created = f.service.insert(dto).await.unwrap();

    assert_eq!(created.id, Some(3));
    assert_eq!(created.roles.len(), 1);
    assert_eq!(created.roles[0].authority, "ROLE_ADMIN");

    let stored = f.users.get(3).unwrap();
    assert_eq!(stored.password, "encoded:s3cret-pass");
}

#[tokio::test]
async fn test_insert_taken_email_is_validation_error() {
    let f = fixture();
    let dto = TestDataFactory::create_user_insert_dto("maria@gmail.com", &[]);

    let err = f.service.insert(dto).await.unwrap_err();

    assert_email_error(err);
    assert_eq!(f.users.save_calls(), 0);
}

#[tokio::test]
async fn test_insert_unknown_role_is_reference_error() {
    let f = fixture();
    let dto = TestDataFactory::create_user_insert_dto("alex@gmail.com", &[9]);

    let err = f.service.insert(dto).await.unwrap_err();

    assert!(matches!(err, AppError::ReferenceError { entity: "Role", id: Some(9) }));
}

#[tokio::test]
async fn test_role_removed_before_link_insert_is_reference_error() {
    let f = fixture();
    f.users
        .fail_next_save(StoreError::IntegrityViolation("fk_user_role_role".to_string()));
    let dto = TestDataFactory::create_user_insert_dto("alex@gmail.com", &[2]);

    let err = f.service.insert(dto).await.unwrap_err();

    assert!(matches!(err, AppError::ReferenceError { entity: "Role", id: None }));
    assert!(f.users.get(3).is_none());
}

#[tokio::test]
async fn test_update_keeps_stored_password() {
    let f = fixture();
    let before = f.users.get(1).unwrap().password;

    let updated = f
        .service
        .update(1, TestDataFactory::create_user_dto("maria@gmail.com"))
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Alex");
    assert!(updated.roles.is_empty());
    assert_eq!(f.users.get(1).unwrap().password, before);
}

#[tokio::test]
async fn test_update_to_another_users_email_is_rejected() {
    let f = fixture();

    let err = f
        .service
        .update(1, TestDataFactory::create_user_dto("bob@gmail.com"))
        .await
        .unwrap_err();

    assert_email_error(err);
}

#[tokio::test]
async fn test_update_non_existing_id_is_not_found() {
    let f = fixture();

    let err = f
        .service
        .update(1000, TestDataFactory::create_user_dto("new@gmail.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound { entity: "User", id: 1000 }));
    assert_eq!(f.users.save_calls(), 0);
}

#[tokio::test]
async fn test_find_by_id_never_exposes_password() {
    let f = fixture();

    let dto = f.service.find_by_id(1).await.unwrap();
    let json = serde_json::to_value(&dto).unwrap();

    assert_eq!(json["email"], "maria@gmail.com");
    assert!(json.get("password").is_none());
}

#[tokio::test]
async fn test_find_all_paged_filters_by_email() {
    let f = fixture();
    let filter = UserFilter {
        email: Some("bob".to_string()),
    };

    let page = f.service.find_all_paged(&filter, &PageRequest::of(0, 5)).await.unwrap();

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].id, Some(2));
}

#[tokio::test]
async fn test_delete_non_existing_id_is_not_found() {
    let f = fixture();

    f.service.delete(2).await.unwrap();
    let err = f.service.delete(2).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound { id: 2, .. }));
    assert_eq!(f.users.delete_calls(), 2);
}
