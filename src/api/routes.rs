//! API route configuration.

use crate::api::handlers::cep_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// Postal code lookup routes.
///
/// # Endpoints
///
/// - `GET /cep/{cep}` - Address for an 8-digit postal code
pub fn cep_routes() -> Router<AppState> {
    Router::new().route("/cep/{cep}", get(cep_handler))
}
