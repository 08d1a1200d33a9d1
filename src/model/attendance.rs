//! Attendance records.
//!
//! `stname` and `crname` are copies of the student name and course title taken
//! when the record is written. They are not references and are never re-synced
//! when the student or course later changes or disappears.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;
use crate::model::{Entity, FieldReader};
use crate::store::Document;
use crate::types::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            other => Err(format!("attendance status must be Present or Absent, got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendance {
    pub id: String,
    pub stname: String,
    pub crname: String,
    pub date: String,
    #[serde(rename = "attendance")]
    pub status: AttendanceStatus,
}

/// Fields written when recording attendance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFields {
    pub stname: String,
    pub crname: String,
    pub date: String,
    #[serde(rename = "attendance")]
    pub status: AttendanceStatus,
}

impl Entity for Attendance {
    const KIND: EntityKind = EntityKind::Attendance;

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(Self::KIND, doc);
        let raw_status = reader.required_str("attendance")?;
        // Exact match only; the form never writes any other spelling
        let status = match raw_status.as_str() {
            "Present" => AttendanceStatus::Present,
            "Absent" => AttendanceStatus::Absent,
            other => {
                return Err(reader.invalid("attendance", format!("must be Present or Absent, found '{}'", other)))
            }
        };

        Ok(Self {
            id: doc.id.clone(),
            stname: reader.required_str("stname")?,
            crname: reader.required_str("crname")?,
            date: reader.required_str("date")?,
            status,
        })
    }
}
