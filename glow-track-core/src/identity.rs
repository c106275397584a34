//! Identity contract for the routine library manager.
//!
//! The manager never talks to an auth backend directly. Whatever provides
//! sign-in (a hosted auth service, a config file, a test fixture) delivers
//! state changes through
//! [`RoutineLibraryManager::on_auth_state_changed`](crate::manager::RoutineLibraryManager::on_auth_state_changed):
//! `Some(identity)` on sign-in, `None` on sign-out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A signed-in user: a stable unique id plus an email for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.email, self.id)
    }
}
