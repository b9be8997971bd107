use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse per-user privilege tier
///
/// Variants are declared in ascending order of privilege, so `Ord` ranks
/// `User < Admin < SuperAdmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    User,
    Admin,
    SuperAdmin,
}

impl Level {
    /// Levels allowed to perform administrative mutations
    pub const ADMIN_LEVELS: [Level; 2] = [Level::Admin, Level::SuperAdmin];

    pub const ALL: [Level; 3] = [Level::User, Level::Admin, Level::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::User => "user",
            Level::Admin => "admin",
            Level::SuperAdmin => "super_admin",
        }
    }

    pub fn is_admin_or_above(&self) -> bool {
        *self >= Level::Admin
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the three level names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown level '{}'", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for Level {
    type Err = UnknownLevel;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Level::User),
            "admin" => Ok(Level::Admin),
            "super_admin" => Ok(Level::SuperAdmin),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}
