use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};

use crate::core::error::AppError;
use crate::core::pagination::{PageLimits, PageParams};
use crate::core::types::resource_location;
use crate::core::validation::validate;
use crate::modules::products::models::{ProductDto, ProductFilter};
use crate::modules::products::repositories::PRODUCT_SORTABLE;
use crate::modules::products::services::ProductService;

/// List products
/// GET /products?category_id=&name=&page=&size=&sort=&direction=
///
/// Sortable by id, name, price and date; defaults to name.
pub async fn find_all(
    service: web::Data<Arc<ProductService>>,
    limits: web::Data<PageLimits>,
    filter: web::Query<ProductFilter>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    let page = params.into_request(&limits, PRODUCT_SORTABLE)?;
    let products = service.find_all_paged(&filter, &page).await?;

    Ok(HttpResponse::Ok().json(products))
}

/// Get product by ID
/// GET /products/{id}
pub async fn find_by_id(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let product = service.find_by_id(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(product))
}

/// Create a product
/// POST /products
pub async fn insert(
    service: web::Data<Arc<ProductService>>,
    body: web::Json<ProductDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    validate(&dto)?;

    let product = service.insert(dto).await?;
    let location = resource_location("products", product.id)?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(product))
}

/// Replace a product
/// PUT /products/{id}
pub async fn update(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<i64>,
    body: web::Json<ProductDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    validate(&dto)?;

    let product = service.update(path.into_inner(), dto).await?;

    Ok(HttpResponse::Ok().json(product))
}

/// Delete a product
/// DELETE /products/{id}
pub async fn delete(
    service: web::Data<Arc<ProductService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(find_all))
            .route("", web::post().to(insert))
            .route("/{id}", web::get().to(find_by_id))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete)),
    );
}
