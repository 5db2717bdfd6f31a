use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::leave_request::LeaveType;

/// Employee profile as the leave core sees it. The record is owned by the
/// wider HR module; the workflow only reads it and mutates `leave_balance`
/// through the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: u64,
    pub hire_date: NaiveDate,
    pub status: String,

    /// Remaining entitlement in days, per leave type. `unpaid` never has an
    /// entry; a missing entry reads as zero.
    pub leave_balance: HashMap<LeaveType, i64>,
}

impl Employee {
    pub fn balance(&self, leave_type: LeaveType) -> i64 {
        self.leave_balance.get(&leave_type).copied().unwrap_or(0)
    }
}
