use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{LeaveError, LeaveResult};
use crate::model::employee::Employee;
use crate::model::leave_request::LeaveType;
use crate::store::EmployeeStore;

/// Inclusive day count between two day-granular dates; `start == end` is 1.
/// Callers validate `start <= end` first.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Per-employee, per-type balance bookkeeping. The balance is a single
/// current-value counter on the employee record; an approved request is an
/// implicit reservation of `days` units, undone by `refund` and re-applied
/// by `deduct` whenever the request mutates. The two are always invoked as
/// a pair when recomputing an approved request's effect, never partially.
pub struct BalanceLedger {
    employees: Arc<dyn EmployeeStore>,
}

impl BalanceLedger {
    pub fn new(employees: Arc<dyn EmployeeStore>) -> Self {
        Self { employees }
    }

    /// Reserve `days` units of `leave_type`. No-op for unpaid leave.
    pub fn deduct(
        &self,
        employee: &mut Employee,
        leave_type: LeaveType,
        days: i64,
    ) -> LeaveResult<()> {
        if !leave_type.consumes_balance() {
            return Ok(());
        }

        let available = employee.balance(leave_type);
        if available < days {
            return Err(LeaveError::InsufficientBalance {
                leave_type,
                available,
                requested: days,
            });
        }

        *employee.leave_balance.entry(leave_type).or_insert(0) -= days;
        self.employees.save(employee)?;
        tracing::debug!(
            employee_id = employee.id,
            %leave_type,
            days,
            remaining = employee.balance(leave_type),
            "balance deducted"
        );
        Ok(())
    }

    /// Release a previous reservation. No-op for unpaid leave; no upper cap
    /// is enforced on the resulting balance.
    pub fn refund(
        &self,
        employee: &mut Employee,
        leave_type: LeaveType,
        days: i64,
    ) -> LeaveResult<()> {
        if !leave_type.consumes_balance() {
            return Ok(());
        }

        *employee.leave_balance.entry(leave_type).or_insert(0) += days;
        self.employees.save(employee)?;
        tracing::debug!(
            employee_id = employee.id,
            %leave_type,
            days,
            remaining = employee.balance(leave_type),
            "balance refunded"
        );
        Ok(())
    }

    /// Creation-time check: a pending request reserves nothing, it only has
    /// to be coverable at submission.
    pub fn check_available(
        &self,
        employee: &Employee,
        leave_type: LeaveType,
        days: i64,
    ) -> LeaveResult<()> {
        if !leave_type.consumes_balance() {
            return Ok(());
        }
        let available = employee.balance(leave_type);
        if available < days {
            return Err(LeaveError::InsufficientBalance {
                leave_type,
                available,
                requested: days,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemEmployeeStore;
    use std::collections::HashMap;

    fn employee(annual: i64) -> Employee {
        Employee {
            id: 1,
            employee_code: "EMP-001".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@company.com".into(),
            department_id: 10,
            hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: "active".into(),
            leave_balance: HashMap::from([(LeaveType::Annual, annual)]),
        }
    }

    fn ledger_with(emp: &Employee) -> (BalanceLedger, Arc<MemEmployeeStore>) {
        let store = Arc::new(MemEmployeeStore::new());
        store.insert(emp.clone()).unwrap();
        (BalanceLedger::new(store.clone()), store)
    }

    #[test]
    fn single_day_span_counts_one() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
        assert_eq!(inclusive_days(day, day), 1);
    }

    #[test]
    fn three_day_span_counts_three() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 12).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(inclusive_days(start, end), 3);
    }

    #[test]
    fn deduct_decrements_and_persists() {
        let mut emp = employee(10);
        let (ledger, store) = ledger_with(&emp);

        ledger.deduct(&mut emp, LeaveType::Annual, 4).unwrap();
        assert_eq!(emp.balance(LeaveType::Annual), 6);
        assert_eq!(
            store.get(1).unwrap().unwrap().balance(LeaveType::Annual),
            6
        );
    }

    #[test]
    fn deduct_rejects_insufficient_balance_untouched() {
        let mut emp = employee(5);
        let (ledger, store) = ledger_with(&emp);

        let err = ledger.deduct(&mut emp, LeaveType::Annual, 6).unwrap_err();
        assert!(matches!(
            err,
            LeaveError::InsufficientBalance {
                available: 5,
                requested: 6,
                ..
            }
        ));
        assert_eq!(emp.balance(LeaveType::Annual), 5);
        assert_eq!(
            store.get(1).unwrap().unwrap().balance(LeaveType::Annual),
            5
        );
    }

    #[test]
    fn unpaid_never_touches_balance() {
        let mut emp = employee(5);
        let (ledger, _) = ledger_with(&emp);

        ledger.deduct(&mut emp, LeaveType::Unpaid, 30).unwrap();
        ledger.refund(&mut emp, LeaveType::Unpaid, 30).unwrap();
        assert_eq!(emp.balance(LeaveType::Annual), 5);
        assert!(!emp.leave_balance.contains_key(&LeaveType::Unpaid));
    }

    #[test]
    fn refund_creates_entry_when_missing() {
        let mut emp = employee(5);
        let (ledger, _) = ledger_with(&emp);

        ledger.refund(&mut emp, LeaveType::Casual, 2).unwrap();
        assert_eq!(emp.balance(LeaveType::Casual), 2);
    }

    #[test]
    fn refund_then_deduct_of_same_amount_nets_zero() {
        let mut emp = employee(7);
        let (ledger, _) = ledger_with(&emp);

        ledger.refund(&mut emp, LeaveType::Annual, 3).unwrap();
        ledger.deduct(&mut emp, LeaveType::Annual, 3).unwrap();
        assert_eq!(emp.balance(LeaveType::Annual), 7);
    }
}
