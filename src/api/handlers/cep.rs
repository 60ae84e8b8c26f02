//! Handler for postal code lookups.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use tracing::{error, warn};

use crate::application::services::{LookupError, NOT_FOUND_MESSAGE};
use crate::domain::cep::is_valid_cep;
use crate::domain::entities::AddressRecord;
use crate::error::AppError;
use crate::state::AppState;

/// Body of the 400 response for malformed postal codes.
pub const INVALID_CEP_MESSAGE: &str = "O CEP deve conter 8 dígitos numéricos.";

/// Body of the 500 response for upstream failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno ao buscar CEP.";

/// Looks up the address for a postal code.
///
/// # Endpoint
///
/// `GET /cep/{cep}` (also `GET /api/cep/{cep}`)
///
/// # Request Flow
///
/// 1. Validate `cep` as exactly 8 ASCII digits
/// 2. Resolve it through [`crate::application::services::CepService`] (cache, then ViaCEP)
/// 3. Return the normalized address
///
/// # Response
///
/// ```json
/// {
///   "cep": "14784478",
///   "logradouro": "Avenida Ranulfo Prata",
///   "bairro": "Jardim Universitário",
///   "localidade": "Barretos",
///   "uf": "SP"
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: `cep` is not 8 digits; the lookup service is not called
/// - **404 Not Found**: ViaCEP does not know the postal code
/// - **500 Internal Server Error**: ViaCEP is unreachable, timed out, or answered garbage
///
/// All error bodies have the form `{"error": "<message>"}`.
pub async fn cep_handler(
    path: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<AddressRecord>, AppError> {
    let cep = match path {
        Ok(Path(cep)) if is_valid_cep(&cep) => cep,
        _ => return Err(AppError::bad_request(INVALID_CEP_MESSAGE)),
    };

    match state.cep_service.lookup(&cep).await {
        Ok(record) => Ok(Json(record)),
        Err(LookupError::NotFound) => {
            warn!(cep = %cep, "CEP not found");
            Err(AppError::not_found(NOT_FOUND_MESSAGE))
        }
        Err(e @ LookupError::Transport(_)) => {
            error!(cep = %cep, error = %e, "Failed to look up CEP");
            Err(AppError::internal(INTERNAL_ERROR_MESSAGE))
        }
    }
}
