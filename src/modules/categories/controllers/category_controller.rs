use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};

use crate::core::error::AppError;
use crate::core::pagination::{PageLimits, PageParams};
use crate::core::types::resource_location;
use crate::core::validation::validate;
use crate::modules::categories::models::{CategoryDto, CategoryFilter};
use crate::modules::categories::repositories::CATEGORY_SORTABLE;
use crate::modules::categories::services::CategoryService;

/// List categories
/// GET /categories?name=&page=&size=&sort=&direction=
pub async fn find_all(
    service: web::Data<Arc<CategoryService>>,
    limits: web::Data<PageLimits>,
    filter: web::Query<CategoryFilter>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let page = params.into_request(&limits, CATEGORY_SORTABLE)?;
    let categories = service.find_all_paged(&filter, &page).await?;

    Ok(HttpResponse::Ok().json(categories))
}

/// Get category by ID
/// GET /categories/{id}
pub async fn find_by_id(
    service: web::Data<Arc<CategoryService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let category = service.find_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(category))
}

/// Create a category
/// POST /categories
pub async fn insert(
    service: web::Data<Arc<CategoryService>>,
    body: web::Json<CategoryDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    validate(&dto)?;

    let category = service.insert(dto).await?;
    let location = resource_location("categories", category.id)?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(category))
}

/// Replace a category
/// PUT /categories/{id}
pub async fn update(
    service: web::Data<Arc<CategoryService>>,
    path: web::Path<i64>,
    body: web::Json<CategoryDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    validate(&dto)?;

    let category = service.update(path.into_inner(), dto).await?;

    Ok(HttpResponse::Ok().json(category))
}

/// Delete a category
/// DELETE /categories/{id}
pub async fn delete(
    service: web::Data<Arc<CategoryService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure category routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(find_all))
            .route("", web::post().to(insert))
            .route("/{id}", web::get().to(find_by_id))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete)),
    );
}
