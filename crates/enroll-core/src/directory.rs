//! Student directory: the data access facade
//!
//! Every call consults the remote backend first. When the remote answers, the
//! answer is authoritative and is mirrored into the fallback store; when it is
//! unreachable, the fallback store answers alone. Callers only ever see
//! `Option`/`bool`/`Vec` results, never transport errors.
//!
//! The two stores are not reconciled after an outage: records written to the
//! fallback store while the remote was unreachable stay local only.

use crate::ports::{Remote, StudentBackend};
use crate::storage::FallbackStore;
use enroll_types::{today, NewStudent, Student, StudentChanges};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StudentDirectory {
    remote: Arc<dyn StudentBackend>,
    fallback: Arc<FallbackStore>,
}

impl StudentDirectory {
    pub fn new(remote: Arc<dyn StudentBackend>, fallback: Arc<FallbackStore>) -> Self {
        Self { remote, fallback }
    }

    pub fn fallback(&self) -> &FallbackStore {
        &self.fallback
    }

    pub async fn get(&self, roll_no: &str) -> Option<Student> {
        match self.remote.fetch(roll_no).await {
            Remote::Answered(Some(student)) => {
                // Read-through population
                self.fallback.set(student.clone());
                Some(student)
            }
            Remote::Answered(None) => {
                debug!("Student {} not found remotely", roll_no);
                None
            }
            Remote::Unreachable(reason) => {
                warn!("get {}: using fallback store ({})", roll_no, reason);
                self.fallback.get(roll_no)
            }
        }
    }

    pub async fn get_all(&self) -> Vec<Student> {
        match self.remote.fetch_all().await {
            Remote::Answered(students) => {
                for student in &students {
                    self.fallback.set(student.clone());
                }
                students
            }
            Remote::Unreachable(reason) => {
                warn!("get_all: using fallback store ({})", reason);
                self.fallback.all()
            }
        }
    }

    /// Enroll a new student, stamping today's date
    ///
    /// Returns `None` when the remote refuses the write, or when the remote is
    /// unreachable and the fallback store already holds the roll number.
    pub async fn create(&self, draft: NewStudent) -> Option<Student> {
        let student = draft.enroll(today());

        match self.remote.put(&student).await {
            Remote::Answered(reply) if reply.succeeded() => {
                info!("Created student {}", student.roll_no);
                self.fallback.set(student.clone());
                Some(student)
            }
            Remote::Answered(reply) => {
                warn!(
                    "create {}: remote refused ({})",
                    student.roll_no, reply.message
                );
                None
            }
            Remote::Unreachable(reason) => {
                if self.fallback.contains(&student.roll_no) {
                    warn!(
                        "create {}: remote unreachable ({}) and roll number already held locally",
                        student.roll_no, reason
                    );
                    return None;
                }
                warn!(
                    "create {}: remote unreachable ({}), stored in fallback",
                    student.roll_no, reason
                );
                self.fallback.set(student.clone());
                Some(student)
            }
        }
    }

    /// Replace every mutable field of an existing student
    ///
    /// Returns the merged record, or `None` when the remote refuses the write
    /// or, with the remote unreachable, the fallback store does not hold the
    /// roll number.
    pub async fn update(&self, roll_no: &str, changes: StudentChanges) -> Option<Student> {
        let merged = changes.apply_to(roll_no);

        match self.remote.update(roll_no, &changes).await {
            Remote::Answered(reply) if reply.succeeded() => {
                info!("Updated student {}", roll_no);
                self.fallback.set(merged.clone());
                Some(merged)
            }
            Remote::Answered(reply) => {
                warn!("update {}: remote refused ({})", roll_no, reply.message);
                None
            }
            Remote::Unreachable(reason) => {
                if !self.fallback.contains(roll_no) {
                    warn!(
                        "update {}: remote unreachable ({}) and no local copy",
                        roll_no, reason
                    );
                    return None;
                }
                warn!(
                    "update {}: remote unreachable ({}), updated fallback",
                    roll_no, reason
                );
                self.fallback.set(merged.clone());
                Some(merged)
            }
        }
    }

    pub async fn delete(&self, roll_no: &str) -> bool {
        match self.remote.remove(roll_no).await {
            Remote::Answered(reply) if reply.succeeded() => {
                info!("Deleted student {}", roll_no);
                self.fallback.delete(roll_no);
                true
            }
            Remote::Answered(reply) => {
                warn!("delete {}: remote refused ({})", roll_no, reply.message);
                false
            }
            Remote::Unreachable(reason) => {
                warn!("delete {}: using fallback store ({})", roll_no, reason);
                self.fallback.delete(roll_no)
            }
        }
    }

    pub async fn exists(&self, roll_no: &str) -> bool {
        self.get(roll_no).await.is_some()
    }

    pub async fn count(&self) -> usize {
        self.get_all().await.len()
    }
}
