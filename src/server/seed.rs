use serde_json::{Map, Value};
use tracing::info;

use crate::store::{Document, MemoryStore};
use crate::types::EntityKind;

/// Course catalogue loaded into a fresh dev server
pub const COURSES: [(&str, &str); 2] = [("1", "React"), ("2", "Angular")];

pub async fn seed_courses(store: &MemoryStore) {
    for (id, title) in COURSES {
        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String(title.to_string()));
        store.seed(EntityKind::Courses, Document::new(id, fields)).await;
    }
    info!("Seeded {} courses", COURSES.len());
}
