use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum_macros::Display;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{LeaveError, LeaveResult};
use crate::ledger::{BalanceLedger, inclusive_days};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeavePatch, LeaveRequest, LeaveStatus, LeaveType};
use crate::notify::{Notification, NotificationDispatcher, NotificationKind, NotifyTarget};
use crate::store::{EmployeeStore, LeaveFilter, LeavePage, LeaveRequestStore};

/// Payload for submitting a new request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeave {
    pub employee_id: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub handover_notes: Option<String>,
    pub contact_during_leave: Option<String>,
}

/// An edit, tagged by who is performing it. Employees may only touch their
/// own requests and always knock the status back to pending; admins may
/// edit any request and move its status at the same time.
#[derive(Debug, Clone)]
pub enum EditRequest {
    Employee { actor_id: u64, patch: LeavePatch },
    Admin {
        actor_id: u64,
        patch: LeavePatch,
        set_status: Option<LeaveStatus>,
        review_comment: Option<String>,
    },
}

impl EditRequest {
    fn patch(&self) -> &LeavePatch {
        match self {
            EditRequest::Employee { patch, .. } | EditRequest::Admin { patch, .. } => patch,
        }
    }
}

/// Review verdict on a pending (or previously reviewed) request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReviewAction {
    Approved,
    Rejected,
}

impl ReviewAction {
    fn status(self) -> LeaveStatus {
        match self {
            ReviewAction::Approved => LeaveStatus::Approved,
            ReviewAction::Rejected => LeaveStatus::Rejected,
        }
    }
}

/// Orchestrates the leave request lifecycle against the balance ledger.
///
/// Every operation runs as one synchronous unit over a single request and
/// its employee. Callers must serialize operations per employee: the
/// refund-then-deduct sequence used when an approved request mutates is not
/// atomic across the two records (see `edit`).
pub struct WorkflowEngine {
    employees: Arc<dyn EmployeeStore>,
    requests: Arc<dyn LeaveRequestStore>,
    notifier: Arc<dyn NotificationDispatcher>,
    ledger: BalanceLedger,
    config: Config,
}

impl WorkflowEngine {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        requests: Arc<dyn LeaveRequestStore>,
        notifier: Arc<dyn NotificationDispatcher>,
        config: Config,
    ) -> Self {
        let ledger = BalanceLedger::new(employees.clone());
        Self {
            employees,
            requests,
            notifier,
            ledger,
            config,
        }
    }

    /// Submit a new request. The balance is only checked here, not
    /// deducted: a pending request reserves nothing until approval.
    pub fn create(&self, payload: CreateLeave) -> LeaveResult<LeaveRequest> {
        if payload.start_date > payload.end_date {
            return Err(LeaveError::InvalidDateRange);
        }
        if payload.reason.trim().is_empty() {
            return Err(LeaveError::ReasonRequired);
        }

        let days = inclusive_days(payload.start_date, payload.end_date);

        let employee = self
            .employees
            .get(payload.employee_id)?
            .ok_or(LeaveError::EmployeeNotFound(payload.employee_id))?;

        self.ledger
            .check_available(&employee, payload.leave_type, days)?;

        let now = Utc::now();
        let request = LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            department_snapshot: employee.department_id,
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            days,
            reason: payload.reason,
            handover_notes: payload.handover_notes,
            contact_during_leave: payload.contact_during_leave,
            status: LeaveStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_comment: None,
            created_at: now,
            updated_at: now,
        };
        self.requests.create(&request)?;

        tracing::info!(
            request_id = %request.id,
            employee_id = employee.id,
            leave_type = %request.leave_type,
            days,
            "leave request submitted"
        );

        self.dispatch(Notification {
            target: NotifyTarget::Role(self.config.reviewer_role),
            kind: NotificationKind::LeaveRequested,
            title: "Leave request submitted".to_string(),
            message: format!(
                "{} {} requested {} day(s) of {} leave",
                employee.first_name, employee.last_name, days, request.leave_type
            ),
            link: self.link_for(request.id),
            metadata: json!({
                "request_id": request.id,
                "employee_id": employee.id,
                "leave_type": request.leave_type,
                "days": days,
                "status": request.status,
            }),
        });

        Ok(request)
    }

    /// Re-enter an existing request. If the request is currently approved
    /// its old effect is refunded up front, before the new values are even
    /// validated, so the edit is evaluated against the pre-edit balance. A
    /// failure after that point leaves the refund applied; the caller
    /// retries.
    pub fn edit(&self, request_id: Uuid, edit: EditRequest) -> LeaveResult<LeaveRequest> {
        let mut request = self
            .requests
            .get(request_id)?
            .ok_or(LeaveError::RequestNotFound(request_id))?;

        if let EditRequest::Employee { actor_id, .. } = &edit {
            if *actor_id != request.employee_id {
                return Err(LeaveError::Forbidden);
            }
        }

        let mut employee = self
            .employees
            .get(request.employee_id)?
            .ok_or(LeaveError::EmployeeNotFound(request.employee_id))?;

        if request.status == LeaveStatus::Approved {
            self.ledger
                .refund(&mut employee, request.leave_type, request.days)?;
        }

        request.merge_patch(edit.patch());
        request.department_snapshot = employee.department_id;

        if request.start_date > request.end_date {
            return Err(LeaveError::InvalidDateRange);
        }
        if request.reason.trim().is_empty() {
            return Err(LeaveError::ReasonRequired);
        }
        request.days = inclusive_days(request.start_date, request.end_date);

        self.ledger
            .check_available(&employee, request.leave_type, request.days)?;

        let now = Utc::now();
        let admin_actor = match edit {
            EditRequest::Admin {
                actor_id,
                set_status,
                review_comment,
                ..
            } => {
                let new_status = set_status.unwrap_or(request.status);
                match new_status {
                    LeaveStatus::Approved => {
                        self.ledger
                            .deduct(&mut employee, request.leave_type, request.days)?;
                    }
                    LeaveStatus::Pending => request.clear_review(),
                    LeaveStatus::Rejected => request.set_review(actor_id, review_comment, now),
                }
                request.status = new_status;
                true
            }
            EditRequest::Employee { .. } => {
                request.status = LeaveStatus::Pending;
                request.clear_review();
                false
            }
        };

        request.updated_at = now;
        self.requests.save(&request)?;

        tracing::info!(
            request_id = %request.id,
            employee_id = request.employee_id,
            status = %request.status,
            admin_actor,
            "leave request edited"
        );

        if admin_actor {
            self.notify_owner_reviewed(&request);
        } else {
            self.dispatch(Notification {
                target: NotifyTarget::Role(self.config.reviewer_role),
                kind: NotificationKind::LeaveUpdated,
                title: "Leave request updated".to_string(),
                message: format!(
                    "{} {} updated their {} leave request ({} day(s))",
                    employee.first_name, employee.last_name, request.leave_type, request.days
                ),
                link: self.link_for(request.id),
                metadata: json!({
                    "request_id": request.id,
                    "employee_id": request.employee_id,
                    "leave_type": request.leave_type,
                    "days": request.days,
                    "status": request.status,
                }),
            });
        }

        Ok(request)
    }

    /// Approve or reject. Re-reviewing an approved request first refunds
    /// its old effect, so approval with unchanged dates nets to zero.
    pub fn review(
        &self,
        request_id: Uuid,
        actor_id: u64,
        action: ReviewAction,
        review_comment: Option<String>,
    ) -> LeaveResult<LeaveRequest> {
        let mut request = self
            .requests
            .get(request_id)?
            .ok_or(LeaveError::RequestNotFound(request_id))?;

        let mut employee = self
            .employees
            .get(request.employee_id)?
            .ok_or(LeaveError::EmployeeNotFound(request.employee_id))?;

        if request.status == LeaveStatus::Approved {
            self.ledger
                .refund(&mut employee, request.leave_type, request.days)?;
        }

        if action == ReviewAction::Approved {
            self.ledger
                .deduct(&mut employee, request.leave_type, request.days)?;
        }

        let now = Utc::now();
        request.status = action.status();
        request.set_review(actor_id, review_comment, now);
        request.updated_at = now;
        self.requests.save(&request)?;

        tracing::info!(
            request_id = %request.id,
            employee_id = request.employee_id,
            reviewer_id = actor_id,
            status = %request.status,
            "leave request reviewed"
        );

        self.notify_owner_reviewed(&request);
        Ok(request)
    }

    /// Paginated listing, with page sizes clamped to the configured cap.
    pub fn list(&self, filter: &LeaveFilter) -> LeaveResult<LeavePage> {
        let resolved = LeaveFilter {
            employee_id: filter.employee_id,
            status: filter.status,
            page: Some(filter.page.unwrap_or(1).max(1)),
            per_page: Some(
                filter
                    .per_page
                    .unwrap_or(self.config.default_per_page)
                    .min(self.config.max_per_page)
                    .max(1),
            ),
        };
        self.requests.query(&resolved)
    }

    pub fn get(&self, request_id: Uuid) -> LeaveResult<LeaveRequest> {
        self.requests
            .get(request_id)?
            .ok_or(LeaveError::RequestNotFound(request_id))
    }

    fn notify_owner_reviewed(&self, request: &LeaveRequest) {
        self.dispatch(Notification {
            target: NotifyTarget::User(request.employee_id),
            kind: NotificationKind::LeaveReviewed,
            title: format!("Leave request {}", request.status),
            message: match &request.review_comment {
                Some(comment) => format!(
                    "Your {} leave request is now {}: {}",
                    request.leave_type, request.status, comment
                ),
                None => format!(
                    "Your {} leave request is now {}",
                    request.leave_type, request.status
                ),
            },
            link: self.link_for(request.id),
            metadata: json!({
                "request_id": request.id,
                "employee_id": request.employee_id,
                "status": request.status,
                "reviewed_by": request.reviewed_by,
            }),
        });
    }

    fn link_for(&self, request_id: Uuid) -> String {
        format!("{}/{}", self.config.link_prefix, request_id)
    }

    // Delivery failures never roll back a leave transition.
    fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(notification) {
            tracing::warn!(error = %e, "notification dispatch failed");
        }
    }

    pub fn employee(&self, employee_id: u64) -> LeaveResult<Employee> {
        self.employees
            .get(employee_id)?
            .ok_or(LeaveError::EmployeeNotFound(employee_id))
    }
}
