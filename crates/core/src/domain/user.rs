use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Single-tenant deployments run every command against this account.
pub const DEMO_USER_ID: UserId = UserId(1);
