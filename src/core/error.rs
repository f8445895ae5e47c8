use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

use super::types::DbId;
use super::validation::{FieldMessage, ValidationError};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type returned by entity stores
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Requested id is absent at read or pre-update-check time
    #[error("{entity} not found: id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Delete blocked because other rows still reference the target
    #[error("Integrity violation: {entity} {id} is referenced by other records")]
    ReferentialConflict { entity: &'static str, id: DbId },

    /// Insert/update references a related entity that does not exist.
    /// `id` is unknown when the database rejected the link without naming it.
    #[error("Referenced {entity} not found{}", id_suffix(.id))]
    ReferenceError { entity: &'static str, id: Option<DbId> },

    /// Request could not be decoded (bad JSON, path or query string)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Malformed or missing transfer-object fields
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

fn id_suffix(id: &Option<DbId>) -> String {
    id.map(|id| format!(": id {}", id)).unwrap_or_default()
}

/// Low-level signal reported by an entity store.
///
/// The services translate these into [`AppError`] kinds; which kind depends on
/// the operation that triggered the signal.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No row with the given id exists
    #[error("{entity} row {id} does not exist")]
    RowAbsent { entity: &'static str, id: DbId },

    /// A foreign key constraint rejected the statement
    #[error("Foreign key constraint violated: {0}")]
    IntegrityViolation(String),

    /// A unique constraint rejected the statement
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_foreign_key_violation() {
                return StoreError::IntegrityViolation(db_err.message().to_string());
            }
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

impl From<StoreError> for AppError {
    /// Default translation for reads. Saves, deletes and reference resolution
    /// use [`AppError::from_save`], [`AppError::from_delete`] and
    /// [`AppError::from_reference`].
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RowAbsent { entity, id } => AppError::NotFound { entity, id },
            StoreError::IntegrityViolation(msg) => AppError::Internal(msg),
            StoreError::UniqueViolation(msg) => {
                AppError::Validation(ValidationError::single("unique", msg))
            }
            StoreError::Database(err) => AppError::Database(err),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationError::from(errors))
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        let mut error = serde_json::json!({
            "code": self.code(),
            "status": status_code.as_u16(),
            "message": self.public_message(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        if let AppError::Validation(validation) = self {
            error["errors"] = serde_json::json!(validation.errors);
        }

        HttpResponse::build(status_code).json(serde_json::json!({ "error": error }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ReferentialConflict { .. } => StatusCode::BAD_REQUEST,
            AppError::ReferenceError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Translate a store signal raised by `delete_by_id`.
    pub fn from_delete(err: StoreError, entity: &'static str, id: DbId) -> Self {
        match err {
            StoreError::RowAbsent { .. } => AppError::NotFound { entity, id },
            StoreError::IntegrityViolation(msg) => {
                tracing::debug!(entity, id, reason = %msg, "Delete rejected by foreign key");
                AppError::ReferentialConflict { entity, id }
            }
            other => AppError::from(other),
        }
    }

    /// Translate a store signal raised while resolving a relation reference.
    pub fn from_reference(err: StoreError) -> Self {
        match err {
            StoreError::RowAbsent { entity, id } => AppError::ReferenceError { entity, id: Some(id) },
            other => AppError::from(other),
        }
    }

    /// Translate a store signal raised by `save`.
    ///
    /// A foreign key failure here means a `related` row vanished between
    /// reference resolution and the link insert.
    pub fn from_save(err: StoreError, related: &'static str) -> Self {
        match err {
            StoreError::IntegrityViolation(msg) => {
                tracing::debug!(entity = related, reason = %msg, "Save rejected by foreign key");
                AppError::ReferenceError { entity: related, id: None }
            }
            other => AppError::from(other),
        }
    }

    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        AppError::Validation(ValidationError::single(field, msg))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Stable machine-readable code for the error body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "RESOURCE_NOT_FOUND",
            AppError::ReferentialConflict { .. } => "INTEGRITY_VIOLATION",
            AppError::ReferenceError { .. } => "INVALID_REFERENCE",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Field messages carried by a validation failure
    pub fn field_messages(&self) -> &[FieldMessage] {
        match self {
            AppError::Validation(validation) => &validation.errors,
            _ => &[],
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) | AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "An internal error occurred".to_string()
            }
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
