use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::core::AppError;

/// Middleware that logs every error response with its status
pub struct ErrorLogger;

impl<S, B> Transform<S, ServiceRequest> for ErrorLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorLoggerMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorLoggerMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.path().to_string();

            let result = service.call(req).await;

            match &result {
                Ok(res) => {
                    if let Some(err) = res.response().error() {
                        log_error(&method.to_string(), &path, res.status().as_u16(), err);
                    }
                }
                Err(err) => {
                    log_error(
                        &method.to_string(),
                        &path,
                        err.as_response_error().status_code().as_u16(),
                        err,
                    );
                }
            }

            result
        })
    }
}

/// Server errors are logged at error level, client errors at debug
pub fn log_error(method: &str, path: &str, status: u16, err: &Error) {
    if status >= 500 {
        tracing::error!(method, path, status, error = %err, "Request failed");
    } else {
        tracing::debug!(method, path, status, error = %err, "Request rejected");
    }
}

/// Malformed JSON bodies answer with the standard error envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    AppError::BadRequest(format!("Malformed JSON payload: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}

/// Register the extractor error handlers on an app or scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
