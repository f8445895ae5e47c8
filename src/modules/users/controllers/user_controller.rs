use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};

use crate::core::error::AppError;
use crate::core::pagination::{PageLimits, PageParams};
use crate::core::types::resource_location;
use crate::core::validation::validate;
use crate::modules::users::models::{UserDto, UserFilter, UserInsertDto};
use crate::modules::users::repositories::USER_SORTABLE;
use crate::modules::users::services::UserService;

/// List users
/// GET /users?email=&page=&size=&sort=&direction=
pub async fn find_all(
    service: web::Data<Arc<UserService>>,
    limits: web::Data<PageLimits>,
    filter: web::Query<UserFilter>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let page = params.into_request(&limits, USER_SORTABLE)?;
    let users = service.find_all_paged(&filter, &page).await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Get user by ID
/// GET /users/{id}
pub async fn find_by_id(
    service: web::Data<Arc<UserService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user = service.find_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Register a user
/// POST /users
pub async fn insert(
    service: web::Data<Arc<UserService>>,
    body: web::Json<UserInsertDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    validate(&dto)?;

    let user = service.insert(dto).await?;
    let location = resource_location("users", user.id)?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(user))
}

/// Replace a user's profile and roles; the password is untouched
/// PUT /users/{id}
pub async fn update(
    service: web::Data<Arc<UserService>>,
    path: web::Path<i64>,
    body: web::Json<UserDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    validate(&dto)?;

    let user = service.update(path.into_inner(), dto).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user
/// DELETE /users/{id}
pub async fn delete(
    service: web::Data<Arc<UserService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(find_all))
            .route("", web::post().to(insert))
            .route("/{id}", web::get().to(find_by_id))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete)),
    );
}
