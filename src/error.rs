use derive_more::{Display, Error};
use uuid::Uuid;

use crate::model::leave_request::LeaveType;

/// ===============================
/// Workflow error taxonomy
/// ===============================
/// Validation and authorization variants are raised before any mutation;
/// `InsufficientBalance` can surface after a reversal has already been
/// applied (see `workflow.rs`).
#[derive(Debug, Display, Error)]
pub enum LeaveError {
    #[display(fmt = "start_date cannot be after end_date")]
    InvalidDateRange,

    #[display(fmt = "reason is required")]
    ReasonRequired,

    #[display(
        fmt = "insufficient {} balance: have {}, need {}",
        leave_type,
        available,
        requested
    )]
    InsufficientBalance {
        leave_type: LeaveType,
        available: i64,
        requested: i64,
    },

    #[display(fmt = "employee {} not found", _0)]
    EmployeeNotFound(#[error(not(source))] u64),

    #[display(fmt = "leave request {} not found", _0)]
    RequestNotFound(#[error(not(source))] Uuid),

    #[display(fmt = "not allowed to modify this leave request")]
    Forbidden,

    #[display(fmt = "store failure: {}", _0)]
    Store(#[error(not(source))] String),
}

impl LeaveError {
    /// HTTP status an embedding API shell should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange | Self::ReasonRequired | Self::InsufficientBalance { .. } => 400,
            Self::Forbidden => 403,
            Self::EmployeeNotFound(_) | Self::RequestNotFound(_) => 404,
            Self::Store(_) => 500,
        }
    }
}

pub type LeaveResult<T> = Result<T, LeaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_api_contract() {
        assert_eq!(LeaveError::InvalidDateRange.status_code(), 400);
        assert_eq!(
            LeaveError::InsufficientBalance {
                leave_type: LeaveType::Annual,
                available: 5,
                requested: 6,
            }
            .status_code(),
            400
        );
        assert_eq!(LeaveError::Forbidden.status_code(), 403);
        assert_eq!(LeaveError::EmployeeNotFound(7).status_code(), 404);
        assert_eq!(LeaveError::RequestNotFound(Uuid::nil()).status_code(), 404);
        assert_eq!(LeaveError::Store("poisoned".into()).status_code(), 500);
    }

    #[test]
    fn insufficient_balance_names_the_leave_type() {
        let err = LeaveError::InsufficientBalance {
            leave_type: LeaveType::Casual,
            available: 1,
            requested: 4,
        };
        assert_eq!(err.to_string(), "insufficient casual balance: have 1, need 4");
    }
}
