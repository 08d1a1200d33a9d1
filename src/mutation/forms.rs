use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{AttendanceStatus, Student, StudentFields};

pub const INCOMPLETE_FORM: &str = "Please fill in all fields";

/// Input fields of the add-student form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub contact: String,
    /// Course id, empty for unassigned
    pub course_id: String,
}

impl StudentForm {
    pub fn from_fields(fields: StudentFields) -> Self {
        Self {
            name: fields.name,
            email: fields.email,
            gender: fields.gender,
            contact: fields.contact,
            course_id: fields.course_id,
        }
    }

    pub fn fields(&self) -> StudentFields {
        StudentFields {
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            contact: self.contact.clone(),
            course_id: self.course_id.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Edit-in-progress state of the update dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    /// Id of the student being edited
    pub editing: Option<String>,
    /// Full replacement field set
    pub form: StudentForm,
}

impl EditState {
    /// Start editing, pre-filled with the student's current values
    pub fn begin(&mut self, student: &Student) {
        self.editing = Some(student.id.clone());
        self.form = StudentForm::from_fields(student.fields());
    }

    pub fn clear(&mut self) {
        self.editing = None;
    }
}

/// Record-attendance form. Selections hold ids into the cached collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceForm {
    pub student_id: String,
    pub course_id: String,
    pub date: String,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceForm {
    /// All four inputs must be present before anything is written
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.student_id.trim().is_empty() {
            missing.push("student");
        }
        if self.course_id.trim().is_empty() {
            missing.push("course");
        }
        if self.date.trim().is_empty() {
            missing.push("date");
        }
        if self.status.is_none() {
            missing.push("status");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::missing(INCOMPLETE_FORM, missing))
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> AttendanceForm {
        AttendanceForm {
            student_id: "s1".into(),
            course_id: "c1".into(),
            date: "2024-03-01".into(),
            status: Some(AttendanceStatus::Present),
        }
    }

    #[test]
    fn complete_form_validates() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn each_missing_field_is_reported() {
        for field in ["student", "course", "date", "status"] {
            let mut form = complete();
            match field {
                "student" => form.student_id.clear(),
                "course" => form.course_id.clear(),
                "date" => form.date = "  ".to_string(),
                _ => form.status = None,
            }
            let err = form.validate().unwrap_err();
            assert_eq!(err.message, INCOMPLETE_FORM);
            assert_eq!(err.missing_fields, vec![field]);
        }
    }

    #[test]
    fn edit_state_prefills_and_clears() {
        let student = Student {
            id: "s1".into(),
            name: "Jane".into(),
            email: "jane@example.com".into(),
            gender: "Female".into(),
            contact: "555".into(),
            course_id: None,
        };
        let mut edit = EditState::default();
        edit.begin(&student);
        assert_eq!(edit.editing.as_deref(), Some("s1"));
        assert_eq!(edit.form.name, "Jane");
        assert_eq!(edit.form.course_id, "");

        edit.clear();
        assert_eq!(edit.editing, None);
    }
}
