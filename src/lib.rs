//! Leave request & balance ledger core.
//!
//! Manages the lifecycle of an employee's leave request from submission
//! through edit, approval, or rejection, while keeping the derived leave
//! balance consistent under repeated edits and re-reviews.
//!
//! # Components
//!
//! - [`ledger`] - balance deduct/refund with insufficient-balance checks
//! - [`workflow`] - create/edit/review orchestration ([`WorkflowEngine`])
//! - [`store`] - employee and request persistence traits plus in-memory
//!   implementations
//! - [`notify`] - outbound notification interface (fire-and-forget)
//! - [`model`] - record shapes shared with the wider HR platform
//!
//! A pending request reserves nothing; the balance is deducted only at
//! approval. When an approved request is edited or re-reviewed, its old
//! effect is refunded before the new one is applied, so re-approving with
//! unchanged dates nets to zero.

pub mod config;
pub mod error;
pub mod ledger;
pub mod model;
pub mod notify;
pub mod store;
pub mod workflow;

pub use config::Config;
pub use error::{LeaveError, LeaveResult};
pub use ledger::BalanceLedger;
pub use model::employee::Employee;
pub use model::leave_request::{LeavePatch, LeaveRequest, LeaveStatus, LeaveType};
pub use model::role::Role;
pub use notify::{Notification, NotificationDispatcher, NotificationKind, NotifyTarget};
pub use store::{
    EmployeeStore, LeaveFilter, LeavePage, LeaveRequestStore, MemEmployeeStore,
    MemLeaveRequestStore,
};
pub use workflow::{CreateLeave, EditRequest, ReviewAction, WorkflowEngine};
