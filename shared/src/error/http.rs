//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::BookingNotFound
            | Self::AssignmentNotFound
            | Self::TimesheetNotFound
            | Self::InvoiceNotFound
            | Self::RateNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::BookingVersionConflict
            | Self::BookingAlreadyConfirmed
            | Self::OfferAlreadyOpen
            | Self::OfferAlreadyResolved
            | Self::TimesheetAlreadyApproved
            | Self::TimesheetAlreadyInvoiced => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired | Self::NotResourceOwner => {
                StatusCode::FORBIDDEN
            }

            // 422 Unprocessable Entity (business rule violations)
            Self::InvalidBookingTransition
            | Self::BookingCancelled
            | Self::InvalidInvoiceTransition => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            ErrorCode::BookingNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_version_conflict_maps_to_409() {
        assert_eq!(
            ErrorCode::BookingVersionConflict.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
