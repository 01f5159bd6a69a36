//! Order status lifecycle
//!
//! Cake orders:   pending -> {confirmed, cancelled}
//!                confirmed -> {in_progress, cancelled}
//!                in_progress -> {completed, cancelled}
//! Course orders: pending -> paid -> verified, with paid -> rejected and
//!                rejected -> paid when a new receipt arrives.

use crate::models::{CakeOrderStatus, CourseOrderStatus, ReceiptStatus};
use crate::utils::errors::{BakeshopError, Result};

/// Statuses a cake order may move to from `from`
pub fn cake_order_targets(from: CakeOrderStatus) -> &'static [CakeOrderStatus] {
    use CakeOrderStatus::*;
    match from {
        Pending => &[Confirmed, Cancelled],
        Confirmed => &[InProgress, Cancelled],
        InProgress => &[Completed, Cancelled],
        Completed | Cancelled => &[],
    }
}

/// Validate a cake order transition.
///
/// Returns the cancellation reason to store: the trimmed reason when moving
/// to `cancelled`, otherwise `None`.
pub fn check_cake_transition(
    from: CakeOrderStatus,
    to: CakeOrderStatus,
    cancellation_reason: Option<&str>,
) -> Result<Option<String>> {
    if !cake_order_targets(from).contains(&to) {
        return Err(BakeshopError::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    if to == CakeOrderStatus::Cancelled {
        let reason = cancellation_reason.map(str::trim).unwrap_or_default();
        if reason.is_empty() {
            return Err(BakeshopError::InvalidInput(
                "cancellation_reason is required when cancelling an order".to_string(),
            ));
        }
        return Ok(Some(reason.to_string()));
    }

    Ok(None)
}

/// A receipt may be uploaded while the order awaits payment or after a rejection
pub fn check_receipt_submission(status: CourseOrderStatus) -> Result<()> {
    match status {
        CourseOrderStatus::Pending | CourseOrderStatus::Rejected => Ok(()),
        other => Err(BakeshopError::InvalidStateTransition {
            from: other.to_string(),
            to: CourseOrderStatus::Paid.to_string(),
        }),
    }
}

/// Verification and rejection both require a submitted receipt on a paid order
pub fn check_receipt_review(receipt: ReceiptStatus, status: CourseOrderStatus, to: CourseOrderStatus) -> Result<()> {
    if receipt != ReceiptStatus::Submitted {
        return Err(BakeshopError::InvalidStateTransition {
            from: format!("receipt {}", receipt),
            to: to.to_string(),
        });
    }

    let allowed = matches!(
        (status, to),
        (CourseOrderStatus::Paid, CourseOrderStatus::Verified)
            | (CourseOrderStatus::Paid, CourseOrderStatus::Rejected)
    );

    if allowed {
        Ok(())
    } else {
        Err(BakeshopError::InvalidStateTransition {
            from: status.to_string(),
            to: to.to_string(),
        })
    }
}
