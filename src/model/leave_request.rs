use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Leave categories with independent balance tracking. `Unpaid` never
/// touches a balance.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveType {
    Annual,
    Sick,
    Casual,
    Unpaid,
}

impl LeaveType {
    pub fn consumes_balance(&self) -> bool {
        !matches!(self, LeaveType::Unpaid)
    }
}

/// Request lifecycle states. There is no terminal state: edits and
/// re-reviews can move a request out of any state indefinitely.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: u64,
    /// Department copied from the employee at submission/edit time, for
    /// reporting without live joins.
    pub department_snapshot: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count between start_date and end_date.
    pub days: i64,
    pub reason: String,
    pub handover_notes: Option<String>,
    pub contact_during_leave: Option<String>,
    pub status: LeaveStatus,
    pub reviewed_by: Option<u64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Overlay patch fields; anything unspecified keeps its prior value.
    /// Dates and day count are re-validated by the caller afterwards.
    pub fn merge_patch(&mut self, patch: &LeavePatch) {
        if let Some(leave_type) = patch.leave_type {
            self.leave_type = leave_type;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(reason) = &patch.reason {
            self.reason = reason.clone();
        }
        if let Some(handover_notes) = &patch.handover_notes {
            self.handover_notes = Some(handover_notes.clone());
        }
        if let Some(contact) = &patch.contact_during_leave {
            self.contact_during_leave = Some(contact.clone());
        }
    }

    /// A pending request carries no review trail.
    pub fn clear_review(&mut self) {
        self.reviewed_by = None;
        self.reviewed_at = None;
        self.review_comment = None;
    }

    pub fn set_review(&mut self, reviewer_id: u64, comment: Option<String>, at: DateTime<Utc>) {
        self.reviewed_by = Some(reviewer_id);
        self.reviewed_at = Some(at);
        self.review_comment = comment;
    }
}

/// Partial update payload for an existing request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeavePatch {
    pub leave_type: Option<LeaveType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub handover_notes: Option<String>,
    pub contact_during_leave: Option<String>,
}
