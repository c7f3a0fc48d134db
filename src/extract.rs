use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with rejections turned into our 400 error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
