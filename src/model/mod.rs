//! Typed records for each entity kind and the decode step at the store boundary.

pub mod attendance;
pub mod course;
pub mod session;
pub mod student;

use serde_json::Value;

use crate::error::DecodeError;
use crate::store::Document;
use crate::types::EntityKind;

pub use attendance::{Attendance, AttendanceFields, AttendanceStatus};
pub use course::Course;
pub use session::{Session, SessionState};
pub use student::{Student, StudentFields};

/// A record type cached by the console, decoded from one collection
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn decode(doc: &Document) -> Result<Self, DecodeError>;
}

/// Field accessor that reports shape mismatches as [`DecodeError`]
pub(crate) struct FieldReader<'a> {
    kind: EntityKind,
    doc: &'a Document,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(kind: EntityKind, doc: &'a Document) -> Self {
        Self { kind, doc }
    }

    fn error(&self, field: &str, reason: impl Into<String>) -> DecodeError {
        DecodeError {
            kind: self.kind,
            id: self.doc.id.clone(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn required_str(&self, field: &str) -> Result<String, DecodeError> {
        match self.doc.fields.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.error(field, format!("must be a string, found {}", type_name(other)))),
            None => Err(self.error(field, "is missing")),
        }
    }

    /// Absent and null both decode to `None`
    pub(crate) fn optional_str(&self, field: &str) -> Result<Option<String>, DecodeError> {
        match self.doc.fields.get(field) {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(self.error(field, format!("must be a string, found {}", type_name(other)))),
        }
    }

    pub(crate) fn invalid(&self, field: &str, reason: impl Into<String>) -> DecodeError {
        self.error(field, reason)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode a whole collection, failing on the first malformed document
pub fn decode_all<T: Entity>(docs: &[Document]) -> Result<Vec<T>, DecodeError> {
    docs.iter().map(T::decode).collect()
}
