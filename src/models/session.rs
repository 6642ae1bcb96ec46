//! Session record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;

/// Server-side record bound to a session key.
///
/// The staff flag is captured at login, so role changes apply from the
/// next login on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
            created_at: Utc::now(),
        }
    }
}

/// A resolved session: the key from the cookie plus its record
#[derive(Debug, Clone)]
pub struct Session {
    pub key: String,
    pub data: SessionData,
}

impl Session {
    pub fn user_id(&self) -> i32 {
        self.data.user_id
    }

    pub fn is_staff(&self) -> bool {
        self.data.is_staff
    }
}
