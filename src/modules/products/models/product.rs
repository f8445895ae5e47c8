use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::core::types::DbId;
use crate::core::validation::{
    not_blank, reference_ids, valid_price, valid_release_date, ValidationError,
};
use crate::modules::categories::models::{Category, CategoryDto};

/// Persisted product row from `tb_product` plus its category links
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    /// Assigned by the store on first save
    pub id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: Option<String>,
    /// Release date
    pub date: DateTime<Utc>,

    /// Joined from `tb_product_category`; unique by category id
    #[sqlx(skip)]
    pub categories: Vec<Category>,
}

impl Product {
    /// Replace the category set, dropping duplicate ids
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        let mut unique: Vec<Category> = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.iter().any(|c| c.id == category.id) {
                unique.push(category);
            }
        }
        self.categories = unique;
    }
}

/// Product transfer object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductDto {
    #[serde(default)]
    pub id: Option<DbId>,

    #[validate(length(min = 5, max = 60, message = "Name must have between 5 and 60 characters"))]
    pub name: String,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "valid_price"))]
    pub price: Decimal,

    #[serde(default)]
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub img_url: Option<String>,

    #[validate(custom(function = "valid_release_date"))]
    pub date: DateTime<Utc>,

    /// Category references; only the ids are read on insert/update
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
}

impl ProductDto {
    /// Mutable-field subset of the entity. Id and categories are resolved by the service.
    pub fn to_entity(&self) -> Product {
        Product {
            id: None,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            img_url: self.img_url.clone(),
            date: self.date,
            categories: Vec::new(),
        }
    }

    /// Referenced category ids in payload order, duplicates removed
    pub fn category_ids(&self) -> Result<Vec<DbId>, ValidationError> {
        reference_ids("categories", self.categories.iter().map(|c| c.id))
    }
}

impl From<Product> for ProductDto {
    fn from(entity: Product) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            img_url: entity.img_url,
            date: entity.date,
            categories: entity.categories.into_iter().map(CategoryDto::from).collect(),
        }
    }
}

/// Query filter for paged product listings (`?category_id=&name=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<DbId>,
    /// Case-insensitive substring match on the name
    pub name: Option<String>,
}
