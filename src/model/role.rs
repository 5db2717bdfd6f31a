use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Actor roles the workflow cares about. Hr and Admin review leave;
/// Employee submits and edits their own requests.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    Hr,
    Employee,
}

impl Role {
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}
