use serde::Serialize;

use crate::error::DecodeError;
use crate::model::{Entity, FieldReader};
use crate::store::Document;
use crate::types::EntityKind;

/// Course catalogue entry. Read-only from the console's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub id: String,
    pub title: String,
}

impl Entity for Course {
    const KIND: EntityKind = EntityKind::Courses;

    fn id(&self) -> &str {
        &self.id
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(Self::KIND, doc);
        Ok(Self {
            id: doc.id.clone(),
            title: reader.required_str("title")?,
        })
    }
}
