use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::core::pagination::PageLimits;
use crate::core::security::{Argon2PasswordEncoder, PasswordEncoder};
use crate::middleware::error_handler;
use crate::modules::categories::{self, CategoryService, CategoryStore, MySqlCategoryRepository};
use crate::modules::health;
use crate::modules::products::{self, MySqlProductRepository, ProductService, ProductStore};
use crate::modules::roles::{self, MySqlRoleRepository, RoleService, RoleStore};
use crate::modules::users::{self, MySqlUserRepository, UserRepository, UserService};

/// Services shared by every worker
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub products: Arc<ProductService>,
    pub roles: Arc<RoleService>,
    pub users: Arc<UserService>,
}

impl AppServices {
    /// Wire the services over arbitrary store implementations
    pub fn new(
        category_store: Arc<CategoryStore>,
        product_store: Arc<ProductStore>,
        role_store: Arc<RoleStore>,
        user_store: Arc<dyn UserRepository>,
        password_encoder: Arc<dyn PasswordEncoder>,
    ) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(category_store.clone())),
            products: Arc::new(ProductService::new(product_store, category_store)),
            roles: Arc::new(RoleService::new(role_store.clone())),
            users: Arc::new(UserService::new(user_store, role_store, password_encoder)),
        }
    }

    /// Wire the services over the MySQL stores
    pub fn mysql(pool: &MySqlPool) -> Self {
        Self::new(
            Arc::new(MySqlCategoryRepository::new(pool.clone())),
            Arc::new(MySqlProductRepository::new(pool.clone())),
            Arc::new(MySqlRoleRepository::new(pool.clone())),
            Arc::new(MySqlUserRepository::new(pool.clone())),
            Arc::new(Argon2PasswordEncoder),
        )
    }
}

/// Register application data, extractor error handlers and every route
pub fn configure_api(
    services: AppServices,
    limits: PageLimits,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(services.categories))
            .app_data(web::Data::new(services.products))
            .app_data(web::Data::new(services.roles))
            .app_data(web::Data::new(services.users))
            .app_data(web::Data::new(limits))
            .configure(error_handler::configure)
            .configure(health::controllers::configure)
            .configure(categories::controllers::configure)
            .configure(products::controllers::configure)
            .configure(roles::controllers::configure)
            .configure(users::controllers::configure);
    }
}
