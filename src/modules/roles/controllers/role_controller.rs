use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};

use crate::core::error::AppError;
use crate::core::pagination::{PageLimits, PageParams};
use crate::core::types::resource_location;
use crate::core::validation::validate;
use crate::modules::roles::models::{RoleDto, RoleFilter};
use crate::modules::roles::repositories::ROLE_SORTABLE;
use crate::modules::roles::services::RoleService;

/// List roles
/// GET /roles?authority=&page=&size=&sort=&direction=
pub async fn find_all(
    service: web::Data<Arc<RoleService>>,
    limits: web::Data<PageLimits>,
    filter: web::Query<RoleFilter>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let page = params.into_request(&limits, ROLE_SORTABLE)?;
    let roles = service.find_all_paged(&filter, &page).await?;

    Ok(HttpResponse::Ok().json(roles))
}

/// Get role by ID
/// GET /roles/{id}
pub async fn find_by_id(
    service: web::Data<Arc<RoleService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let role = service.find_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(role))
}

/// Create a role
/// POST /roles
pub async fn insert(
    service: web::Data<Arc<RoleService>>,
    body: web::Json<RoleDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    validate(&dto)?;

    let role = service.insert(dto).await?;
    let location = resource_location("roles", role.id)?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(role))
}

/// Replace a role
/// PUT /roles/{id}
pub async fn update(
    service: web::Data<Arc<RoleService>>,
    path: web::Path<i64>,
    body: web::Json<RoleDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    validate(&dto)?;

    let role = service.update(path.into_inner(), dto).await?;

    Ok(HttpResponse::Ok().json(role))
}

/// Delete a role
/// DELETE /roles/{id}
pub async fn delete(
    service: web::Data<Arc<RoleService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure role routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/roles")
            .route("", web::get().to(find_all))
            .route("", web::post().to(insert))
            .route("/{id}", web::get().to(find_by_id))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete)),
    );
}
