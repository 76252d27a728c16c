use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejections render as our `{"error": ...}` 400 body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
