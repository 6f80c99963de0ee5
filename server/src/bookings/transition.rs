//! Booking status transition table
//!
//! Every status write funnels through [`check_transition`]; there is no
//! second path that flips a booking's status.

use crate::db::models::BookingStatus;
use shared::{AppError, ErrorCode};

/// Whether `from -> to` is a legal booking transition
pub fn allowed(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Requested, Offered)
            // direct-assign skips the offer round
            | (Requested, Confirmed)
            | (Offered, Confirmed)
            | (Requested, Cancelled)
            | (Offered, Cancelled)
            | (Confirmed, Completed)
            | (Completed, Invoiced)
            | (Invoiced, Paid)
    )
}

/// Validate a transition, mapping the interesting refusals to their own
/// error codes
pub fn check_transition(from: BookingStatus, to: BookingStatus) -> Result<(), AppError> {
    if allowed(from, to) {
        return Ok(());
    }
    let code = match from {
        BookingStatus::Cancelled => ErrorCode::BookingCancelled,
        BookingStatus::Confirmed if to == BookingStatus::Confirmed => {
            ErrorCode::BookingAlreadyConfirmed
        }
        _ => ErrorCode::InvalidBookingTransition,
    };
    Err(AppError::conflict(
        code,
        format!(
            "Booking cannot go from {} to {}",
            from.as_str(),
            to.as_str()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_happy_path_chain() {
        for (from, to) in [
            (Requested, Offered),
            (Offered, Confirmed),
            (Confirmed, Completed),
            (Completed, Invoiced),
            (Invoiced, Paid),
        ] {
            assert!(allowed(from, to), "{:?} -> {:?}", from, to);
        }
    }

    #[test]
    fn test_direct_assign_skips_offer_round() {
        assert!(allowed(Requested, Confirmed));
    }

    #[test]
    fn test_cancel_only_before_confirmation() {
        assert!(allowed(Requested, Cancelled));
        assert!(allowed(Offered, Cancelled));
        assert!(!allowed(Confirmed, Cancelled));
        assert!(!allowed(Completed, Cancelled));
    }

    #[test]
    fn test_terminal_states_stay_terminal() {
        for to in [Requested, Offered, Confirmed, Completed, Invoiced, Paid] {
            assert!(!allowed(Cancelled, to));
        }
        for to in [Requested, Offered, Confirmed, Completed, Invoiced] {
            assert!(!allowed(Paid, to));
        }
    }

    #[test]
    fn test_no_backwards_moves() {
        assert!(!allowed(Confirmed, Offered));
        assert!(!allowed(Completed, Confirmed));
        assert!(!allowed(Invoiced, Completed));
    }

    #[test]
    fn test_cancelled_refusal_carries_its_own_code() {
        let err = check_transition(Cancelled, Confirmed).unwrap_err();
        assert_eq!(err.code, ErrorCode::BookingCancelled);
    }

    #[test]
    fn test_double_confirm_refusal_carries_its_own_code() {
        let err = check_transition(Confirmed, Confirmed).unwrap_err();
        assert_eq!(err.code, ErrorCode::BookingAlreadyConfirmed);
    }
}
