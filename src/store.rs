use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LeaveError, LeaveResult};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};

/// Read/write access to employee profiles. The workflow only ever touches
/// the leave balance; everything else on the record is owned elsewhere.
pub trait EmployeeStore: Send + Sync {
    fn get(&self, employee_id: u64) -> LeaveResult<Option<Employee>>;
    fn save(&self, employee: &Employee) -> LeaveResult<()>;
}

/// Persistence for leave requests. No delete: requests stay mutable forever.
pub trait LeaveRequestStore: Send + Sync {
    fn create(&self, request: &LeaveRequest) -> LeaveResult<()>;
    fn get(&self, request_id: Uuid) -> LeaveResult<Option<LeaveRequest>>;
    fn save(&self, request: &LeaveRequest) -> LeaveResult<()>;
    fn query(&self, filter: &LeaveFilter) -> LeaveResult<LeavePage>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveFilter {
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    /// Filter by leave status
    pub status: Option<LeaveStatus>,
    /// Pagination page number (1-based)
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeavePage {
    pub data: Vec<LeaveRequest>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// ===============================
/// In-memory stores
/// ===============================
/// Mutex-guarded maps standing in for the database tables. Each call is
/// atomic on its own record; serializing whole workflow operations per
/// employee is the embedder's job.
#[derive(Default)]
pub struct MemEmployeeStore {
    records: Mutex<HashMap<u64, Employee>>,
}

impl MemEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, employee: Employee) -> LeaveResult<()> {
        let mut records = lock(&self.records)?;
        records.insert(employee.id, employee);
        Ok(())
    }
}

impl EmployeeStore for MemEmployeeStore {
    fn get(&self, employee_id: u64) -> LeaveResult<Option<Employee>> {
        let records = lock(&self.records)?;
        Ok(records.get(&employee_id).cloned())
    }

    fn save(&self, employee: &Employee) -> LeaveResult<()> {
        let mut records = lock(&self.records)?;
        records.insert(employee.id, employee.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemLeaveRequestStore {
    records: Mutex<HashMap<Uuid, LeaveRequest>>,
}

impl MemLeaveRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaveRequestStore for MemLeaveRequestStore {
    fn create(&self, request: &LeaveRequest) -> LeaveResult<()> {
        let mut records = lock(&self.records)?;
        if records.contains_key(&request.id) {
            return Err(LeaveError::Store(format!(
                "duplicate leave request id {}",
                request.id
            )));
        }
        records.insert(request.id, request.clone());
        Ok(())
    }

    fn get(&self, request_id: Uuid) -> LeaveResult<Option<LeaveRequest>> {
        let records = lock(&self.records)?;
        Ok(records.get(&request_id).cloned())
    }

    fn save(&self, request: &LeaveRequest) -> LeaveResult<()> {
        let mut records = lock(&self.records)?;
        records.insert(request.id, request.clone());
        Ok(())
    }

    fn query(&self, filter: &LeaveFilter) -> LeaveResult<LeavePage> {
        let per_page = filter.per_page.unwrap_or(10).min(100).max(1);
        let page = filter.page.unwrap_or(1).max(1);
        let offset = (page - 1) * per_page;

        let records = lock(&self.records)?;
        let mut matches: Vec<&LeaveRequest> = records
            .values()
            .filter(|r| filter.employee_id.is_none_or(|id| r.employee_id == id))
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .collect();

        // Newest first, id as tiebreak for a stable order.
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matches.len() as u64;
        let data = matches
            .into_iter()
            .skip(offset as usize)
            .take(per_page as usize)
            .cloned()
            .collect();

        Ok(LeavePage {
            data,
            page,
            per_page,
            total,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> LeaveResult<std::sync::MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|e| LeaveError::Store(format!("lock poisoned: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveType;
    use chrono::{Duration, NaiveDate, Utc};

    fn request_for(employee_id: u64, status: LeaveStatus, age_days: i64) -> LeaveRequest {
        let created = Utc::now() - Duration::days(age_days);
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id,
            department_snapshot: 10,
            leave_type: LeaveType::Annual,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            days: 3,
            reason: "Family event".into(),
            handover_notes: None,
            contact_during_leave: None,
            status,
            reviewed_by: None,
            reviewed_at: None,
            review_comment: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn query_filters_by_employee_and_status() {
        let store = MemLeaveRequestStore::new();
        store.create(&request_for(1, LeaveStatus::Pending, 2)).unwrap();
        store.create(&request_for(1, LeaveStatus::Approved, 1)).unwrap();
        store.create(&request_for(2, LeaveStatus::Pending, 0)).unwrap();

        let page = store
            .query(&LeaveFilter {
                employee_id: Some(1),
                status: Some(LeaveStatus::Pending),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].employee_id, 1);
        assert_eq!(page.data[0].status, LeaveStatus::Pending);
    }

    #[test]
    fn query_paginates_newest_first() {
        let store = MemLeaveRequestStore::new();
        for age in 0..5 {
            store.create(&request_for(1, LeaveStatus::Pending, age)).unwrap();
        }

        let first = store
            .query(&LeaveFilter {
                page: Some(1),
                per_page: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.data.len(), 2);
        assert!(first.data[0].created_at >= first.data[1].created_at);

        let last = store
            .query(&LeaveFilter {
                page: Some(3),
                per_page: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(last.data.len(), 1);
    }

    #[test]
    fn save_overwrites_existing_request() {
        let store = MemLeaveRequestStore::new();
        let mut req = request_for(1, LeaveStatus::Pending, 0);
        store.create(&req).unwrap();

        req.status = LeaveStatus::Approved;
        store.save(&req).unwrap();

        let loaded = store.get(req.id).unwrap().unwrap();
        assert_eq!(loaded.status, LeaveStatus::Approved);
    }

    #[test]
    fn duplicate_create_is_a_store_error() {
        let store = MemLeaveRequestStore::new();
        let req = request_for(1, LeaveStatus::Pending, 0);
        store.create(&req).unwrap();
        assert!(matches!(store.create(&req), Err(LeaveError::Store(_))));
    }
}
