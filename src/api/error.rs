//! Error envelope shared by all endpoints

use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::carriers::CarrierError;
use crate::engine::EngineError;
use crate::rating::RateShopError;

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

#[derive(Serialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message: message.into(),
        },
    })
}

/// HTTP status and stable error code for an engine failure
pub fn classify(err: &EngineError) -> (StatusCode, &'static str) {
    match err {
        EngineError::InvalidPackage(_) => (StatusCode::BAD_REQUEST, "INVALID_PACKAGE"),
        EngineError::UnknownCarrier(_) => (StatusCode::NOT_FOUND, "UNKNOWN_CARRIER"),
        EngineError::UnknownService(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_SERVICE"),
        EngineError::RateShop(RateShopError::NoRatesAvailable { .. }) => {
            (StatusCode::SERVICE_UNAVAILABLE, "NO_RATES_AVAILABLE")
        }
        EngineError::Carrier(carrier) => match carrier {
            CarrierError::AuthFailed(_) => (StatusCode::BAD_GATEWAY, "CARRIER_AUTH_FAILED"),
            CarrierError::InvalidAddress(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_ADDRESS"),
            CarrierError::LabelRejected(_) => (StatusCode::UNPROCESSABLE_ENTITY, "LABEL_REJECTED"),
            CarrierError::Rejected(_) => (StatusCode::UNPROCESSABLE_ENTITY, "CARRIER_REJECTED"),
            CarrierError::NotFound(_) => (StatusCode::NOT_FOUND, "TRACKING_NOT_FOUND"),
            CarrierError::UnsupportedService(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_SERVICE"),
            CarrierError::Transient(_)
            | CarrierError::RateLimited { .. }
            | CarrierError::Parse(_)
            | CarrierError::NotConfigured(_) => (StatusCode::SERVICE_UNAVAILABLE, "CARRIER_UNAVAILABLE"),
        },
    }
}

pub fn engine_error_response(err: &EngineError) -> HttpResponse {
    let (status, code) = classify(err);
    error_response(status, code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageError;

    #[test]
    fn test_classify() {
        let cases = [
            (EngineError::InvalidPackage(PackageError::NoItems), StatusCode::BAD_REQUEST, "INVALID_PACKAGE"),
            (EngineError::UnknownCarrier("ups".into()), StatusCode::NOT_FOUND, "UNKNOWN_CARRIER"),
            (
                EngineError::RateShop(RateShopError::NoRatesAvailable { attempted: 3, failures: vec![] }),
                StatusCode::SERVICE_UNAVAILABLE,
                "NO_RATES_AVAILABLE",
            ),
            (
                EngineError::Carrier(CarrierError::AuthFailed("expired".into())),
                StatusCode::BAD_GATEWAY,
                "CARRIER_AUTH_FAILED",
            ),
            (
                EngineError::Carrier(CarrierError::InvalidAddress("zip".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_ADDRESS",
            ),
            (
                EngineError::Carrier(CarrierError::Transient("503".into())),
                StatusCode::SERVICE_UNAVAILABLE,
                "CARRIER_UNAVAILABLE",
            ),
            (
                EngineError::Carrier(CarrierError::NotFound("123".into())),
                StatusCode::NOT_FOUND,
                "TRACKING_NOT_FOUND",
            ),
            (
                EngineError::Carrier(CarrierError::LabelRejected("too heavy".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "LABEL_REJECTED",
            ),
            (
                EngineError::Carrier(CarrierError::Rejected("TRACKING.REFERENCE.INVALID".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "CARRIER_REJECTED",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(classify(&err), (status, code), "{}", err);
        }
    }
}
