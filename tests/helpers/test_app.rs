// Test application wiring
//
// Builds the full route table over in-memory stores so contract tests can
// drive the real controllers with actix_web::test.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test, App, Error,
};
use dscatalog::categories::Category;
use dscatalog::core::pagination::PageLimits;
use dscatalog::core::security::PasswordEncoder;
use dscatalog::core::Result;
use dscatalog::middleware::{ErrorLogger, RequestId};
use dscatalog::products::Product;
use dscatalog::roles::Role;
use dscatalog::users::User;
use dscatalog::{configure_api, AppServices};

use super::memory_store::InMemoryStore;
use super::test_data::TestDataFactory;

/// Reversible stand-in for Argon2 so assertions can see what was stored
pub struct PlainTextEncoder;

impl PasswordEncoder for PlainTextEncoder {
    fn encode(&self, raw: &str) -> Result<String> {
        Ok(format!("encoded:{}", raw))
    }

    fn matches(&self, raw: &str, encoded: &str) -> Result<bool> {
        Ok(encoded == format!("encoded:{}", raw))
    }
}

/// One in-memory store per entity, shared with the services under test
#[derive(Clone)]
pub struct TestStores {
    pub categories: Arc<InMemoryStore<Category>>,
    pub products: Arc<InMemoryStore<Product>>,
    pub roles: Arc<InMemoryStore<Role>>,
    pub users: Arc<InMemoryStore<User>>,
}

impl Default for TestStores {
    fn default() -> Self {
        Self {
            categories: Arc::new(InMemoryStore::new()),
            products: Arc::new(InMemoryStore::new()),
            roles: Arc::new(InMemoryStore::new()),
            users: Arc::new(InMemoryStore::new()),
        }
    }
}

impl TestStores {
    /// Categories 2 and 3, products 1 ("Phone") and 4 ("Notebook", still
    /// referenced by an order), roles 1 and 2, user 1
    pub fn with_catalog() -> Self {
        let mut notebook = TestDataFactory::create_product_with(4, "Notebook");
        notebook.categories = vec![TestDataFactory::create_category(3, "Computers")];

        let stores = Self {
            categories: Arc::new(InMemoryStore::with_rows(vec![
                TestDataFactory::create_category(2, "Electronics"),
                TestDataFactory::create_category(3, "Computers"),
            ])),
            products: Arc::new(InMemoryStore::with_rows(vec![
                TestDataFactory::create_product(),
                notebook,
            ])),
            roles: Arc::new(InMemoryStore::with_rows(vec![
                TestDataFactory::create_role(1, "ROLE_OPERATOR"),
                TestDataFactory::create_role(2, "ROLE_ADMIN"),
            ])),
            users: Arc::new(InMemoryStore::with_rows(vec![TestDataFactory::create_user(
                1,
                "maria@gmail.com",
            )])),
        };
        stores.products.mark_referenced(4);
        stores.categories.mark_referenced(2);
        stores
    }

    pub fn services(&self) -> AppServices {
        AppServices::new(
            self.categories.clone(),
            self.products.clone(),
            self.roles.clone(),
            self.users.clone(),
            Arc::new(PlainTextEncoder),
        )
    }
}

/// Initialise the application with the production route table and middleware
pub async fn init_app(
    stores: &TestStores,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(ErrorLogger)
            .wrap(RequestId)
            .configure(configure_api(stores.services(), PageLimits::default())),
    )
    .await
}
