use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::model::{Entity, FieldReader};
use crate::store::Document;
use crate::types::EntityKind;

/// A student row as cached from the `students` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub contact: String,
    /// Reference to `Course::id`; absent or empty means unassigned
    #[serde(rename = "courseId")]
    pub course_id: Option<String>,
}

/// Writable fields of a student. Updates always send the full set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub contact: String,
    #[serde(rename = "courseId")]
    pub course_id: String,
}

impl Student {
    /// Assigned course id, with empty treated as unassigned
    pub fn course_id(&self) -> Option<&str> {
        self.course_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn fields(&self) -> StudentFields {
        StudentFields {
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            contact: self.contact.clone(),
            course_id: self.course_id.clone().unwrap_or_default(),
        }
    }
}

impl Entity for Student {
    const KIND: EntityKind = EntityKind::Students;

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(Self::KIND, doc);
        Ok(Self {
            id: doc.id.clone(),
            name: reader.required_str("name")?,
            email: reader.required_str("email")?,
            gender: reader.required_str("gender")?,
            contact: reader.required_str("contact")?,
            course_id: reader.optional_str("courseId")?,
        })
    }
}
