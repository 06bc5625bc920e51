pub mod extract;
pub mod health;
pub mod invoice_get;
pub mod invoice_search;

use crate::error::HttpAppError;
use invoicer_core::AppError;

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("Not found".to_string()))
}
