/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named collections in the remote document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Students,
    Courses,
    Attendance,
}

impl EntityKind {
    /// Initial page load order: students, then courses, then attendance
    pub const ALL: [EntityKind; 3] = [EntityKind::Students, EntityKind::Courses, EntityKind::Attendance];

    /// Collection name as used by the store and on the wire
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Students => "students",
            EntityKind::Courses => "courses",
            EntityKind::Attendance => "attendance",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "students" => Ok(EntityKind::Students),
            "courses" => Ok(EntityKind::Courses),
            "attendance" => Ok(EntityKind::Attendance),
            other => Err(format!("unknown collection '{}'", other)),
        }
    }
}

/// Mutations run through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.collection().parse::<EntityKind>(), Ok(kind));
        }
        assert!("teachers".parse::<EntityKind>().is_err());
    }
}
