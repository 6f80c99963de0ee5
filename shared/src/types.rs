//! Common wire-level types

use serde::{Deserialize, Serialize};

/// Account role on the platform
///
/// Admins operate the console; clients book interpreters through the
/// portal; interpreters respond to offers and submit timesheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Client,
    Interpreter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Client => "CLIENT",
            Self::Interpreter => "INTERPRETER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Self::Admin),
            "CLIENT" => Some(Self::Client),
            "INTERPRETER" => Some(Self::Interpreter),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
