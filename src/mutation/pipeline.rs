use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::Collections;
use crate::error::{StoreError, ValidationError};
use crate::join::{find_course_title, find_student_name};
use crate::model::AttendanceFields;
use crate::mutation::forms::{AttendanceForm, EditState, StudentForm, INCOMPLETE_FORM};
use crate::mutation::notify::Notifier;
use crate::mutation::{Confirm, ConfirmPrompt, MutationState, MutationStatus};
use crate::store::{to_fields, DocumentStore, Fields};
use crate::types::{EntityKind, Operation};

/// Runs writes against the store and refreshes the affected collection
pub struct MutationPipeline {
    store: Arc<dyn DocumentStore>,
    collections: Arc<Collections>,
    notifier: Notifier,
    students: watch::Sender<MutationState>,
    attendance: watch::Sender<MutationState>,
}

impl MutationPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, collections: Arc<Collections>, notifier: Notifier) -> Self {
        let (students, _) = watch::channel(MutationState::Idle);
        let (attendance, _) = watch::channel(MutationState::Idle);
        Self {
            store,
            collections,
            notifier,
            students,
            attendance,
        }
    }

    /// Current state of the most recent mutation against `kind`
    pub fn state(&self, kind: EntityKind) -> MutationState {
        self.machine(kind).map_or(MutationState::Idle, |tx| *tx.borrow())
    }

    pub fn subscribe_state(&self, kind: EntityKind) -> Option<watch::Receiver<MutationState>> {
        self.machine(kind).map(watch::Sender::subscribe)
    }

    // Courses have no mutation path
    fn machine(&self, kind: EntityKind) -> Option<&watch::Sender<MutationState>> {
        match kind {
            EntityKind::Students => Some(&self.students),
            EntityKind::Attendance => Some(&self.attendance),
            EntityKind::Courses => None,
        }
    }

    fn transition(&self, kind: EntityKind, next: MutationState) {
        if let Some(tx) = self.machine(kind) {
            let prev = tx.send_replace(next);
            debug!("{} mutation: {:?} -> {:?}", kind, prev, next);
        }
    }

    fn invalid(&self, kind: EntityKind, error: ValidationError) -> MutationStatus {
        self.notifier.error(error.message.clone());
        self.transition(kind, MutationState::Idle);
        MutationStatus::Invalid(error)
    }

    fn failed(&self, kind: EntityKind, op: Operation, error: StoreError, message: &str) -> MutationStatus {
        warn!("{:?} on {} failed: {}", op, kind, error);
        self.notifier.error(message);
        self.transition(kind, MutationState::Idle);
        MutationStatus::Failed(error)
    }

    /// Remote write, then a refresh of the same kind
    async fn submit(
        &self,
        kind: EntityKind,
        op: Operation,
        write: impl std::future::Future<Output = Result<(), StoreError>>,
        failure_message: &str,
    ) -> Result<(), MutationStatus> {
        self.transition(kind, MutationState::Submitting);
        if let Err(e) = write.await {
            return Err(self.failed(kind, op, e, failure_message));
        }

        self.transition(kind, MutationState::Refreshing);
        let outcome = self.collections.refresh(kind).await;
        info!("{:?} on {} settled, refresh {:?}", op, kind, outcome);
        Ok(())
    }

    fn settle(&self, kind: EntityKind, message: &str) -> MutationStatus {
        self.notifier.success(message);
        self.transition(kind, MutationState::Idle);
        MutationStatus::Settled
    }

    /// Add a student from the form; the form is reset only on success
    pub async fn create_student(&self, form: &mut StudentForm) -> MutationStatus {
        let kind = EntityKind::Students;
        self.transition(kind, MutationState::Validating);
        let fields = match to_fields(&form.fields()) {
            Ok(fields) => fields,
            Err(e) => return self.failed(kind, Operation::Create, e, "Failed to add student"),
        };

        let store = Arc::clone(&self.store);
        let write = async move { store.create(kind, fields).await.map(|_| ()) };
        if let Err(status) = self.submit(kind, Operation::Create, write, "Failed to add student").await {
            return status;
        }

        form.reset();
        self.settle(kind, "Student added successfully!")
    }

    /// Rewrite every field of the student being edited
    pub async fn update_student(&self, edit: &mut EditState) -> MutationStatus {
        let kind = EntityKind::Students;
        self.transition(kind, MutationState::Validating);
        let id = match edit.editing.clone() {
            Some(id) => id,
            None => return self.invalid(kind, ValidationError::new("Select a student to update")),
        };
        let fields = match to_fields(&edit.form.fields()) {
            Ok(fields) => fields,
            Err(e) => return self.failed(kind, Operation::Update, e, "Failed to update student"),
        };

        let store = Arc::clone(&self.store);
        let target = id.clone();
        let write = async move { store.update(kind, &target, fields).await };
        if let Err(status) = self
            .submit(kind, Operation::Update, write, "Failed to update student")
            .await
        {
            return status;
        }

        edit.clear();
        self.settle(kind, "Student Updated successfully!")
    }

    /// Delete a student after explicit confirmation. `display_name` only feeds the prompt.
    pub async fn delete_student(&self, id: &str, display_name: &str, confirm: &dyn Confirm) -> MutationStatus {
        let kind = EntityKind::Students;
        if !confirm.confirm(&ConfirmPrompt::deletion(display_name)).await {
            debug!("Deletion of {}/{} cancelled", kind, id);
            return MutationStatus::Cancelled;
        }

        self.transition(kind, MutationState::Validating);
        let store = Arc::clone(&self.store);
        let target = id.to_string();
        let write = async move { store.delete(kind, &target).await };
        if let Err(status) = self
            .submit(kind, Operation::Delete, write, "Failed to delete student")
            .await
        {
            return status;
        }

        self.settle(kind, "Student deleted successfully!")
    }

    /// Record attendance for the selected student and course.
    ///
    /// The student's name and the course's title are copied from the current
    /// caches into the record; later renames do not reach it.
    pub async fn record_attendance(&self, form: &mut AttendanceForm) -> MutationStatus {
        let kind = EntityKind::Attendance;
        self.transition(kind, MutationState::Validating);
        if let Err(e) = form.validate() {
            return self.invalid(kind, e);
        }
        let status = match form.status {
            Some(status) => status,
            None => return self.invalid(kind, ValidationError::missing(INCOMPLETE_FORM, vec!["status"])),
        };

        let students = self.collections.students().snapshot();
        let courses = self.collections.courses().snapshot();
        let stname = match find_student_name(&form.student_id, &students) {
            Some(name) => name.to_string(),
            None => return self.invalid(kind, ValidationError::new("Selected student is no longer available")),
        };
        let crname = match find_course_title(&form.course_id, &courses) {
            Some(title) => title.to_string(),
            None => return self.invalid(kind, ValidationError::new("Selected course is no longer available")),
        };

        let record = AttendanceFields {
            stname,
            crname,
            date: form.date.trim().to_string(),
            status,
        };
        let fields: Fields = match to_fields(&record) {
            Ok(fields) => fields,
            Err(e) => return self.failed(kind, Operation::Create, e, "Failed to record attendance"),
        };

        let store = Arc::clone(&self.store);
        let write = async move { store.create(kind, fields).await.map(|_| ()) };
        if let Err(status) = self
            .submit(kind, Operation::Create, write, "Failed to record attendance")
            .await
        {
            return status;
        }

        form.reset();
        self.settle(kind, "Attendance recorded successfully!")
    }
}
