use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::model::role::Role;

#[derive(Clone)]
pub struct Config {
    /// Role notified when a request is submitted or updated by its owner.
    pub reviewer_role: Role,
    /// Prefix for notification deep links, e.g. "/leave" -> "/leave/{id}".
    pub link_prefix: String,

    // List query pagination
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            reviewer_role: env::var("LEAVE_REVIEWER_ROLE")
                .ok()
                .and_then(|v| Role::from_str(&v).ok())
                .unwrap_or(Role::Hr),
            link_prefix: env::var("LEAVE_LINK_PREFIX").unwrap_or_else(|_| "/leave".to_string()),
            default_per_page: env::var("LEAVE_DEFAULT_PER_PAGE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            max_per_page: env::var("LEAVE_MAX_PER_PAGE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reviewer_role: Role::Hr,
            link_prefix: "/leave".to_string(),
            default_per_page: 10,
            max_per_page: 100,
        }
    }
}
