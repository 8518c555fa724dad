//! Student types

use serde::{Deserialize, Serialize};

/// An enrolled student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Caller-assigned primary key, immutable after creation
    pub roll_no: String,
    pub full_name: String,
    pub class: String,
    pub birth_date: String,
    pub address: String,
    /// `YYYY-MM-DD`, set at creation time
    pub enrollment_date: String,
}

impl Student {
    /// Split off the mutable part of the record
    pub fn changes(&self) -> StudentChanges {
        StudentChanges {
            full_name: self.full_name.clone(),
            class: self.class.clone(),
            birth_date: self.birth_date.clone(),
            address: self.address.clone(),
            enrollment_date: self.enrollment_date.clone(),
        }
    }
}

/// A student as submitted for enrollment (no enrollment date yet)
///
/// Fields default to empty so that a partial body still deserializes and the
/// missing fields can be reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewStudent {
    pub roll_no: String,
    pub full_name: String,
    pub class: String,
    pub birth_date: String,
    pub address: String,
}

impl NewStudent {
    /// Stamp the enrollment date and produce the stored record
    pub fn enroll(self, enrollment_date: impl Into<String>) -> Student {
        Student {
            roll_no: self.roll_no,
            full_name: self.full_name,
            class: self.class,
            birth_date: self.birth_date,
            address: self.address,
            enrollment_date: enrollment_date.into(),
        }
    }
}

/// Every mutable field of a student
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentChanges {
    pub full_name: String,
    pub class: String,
    pub birth_date: String,
    pub address: String,
    pub enrollment_date: String,
}

impl StudentChanges {
    /// Merge into the record `{roll_no, ..changes}`
    pub fn apply_to(&self, roll_no: &str) -> Student {
        Student {
            roll_no: roll_no.to_string(),
            full_name: self.full_name.clone(),
            class: self.class.clone(),
            birth_date: self.birth_date.clone(),
            address: self.address.clone(),
            enrollment_date: self.enrollment_date.clone(),
        }
    }
}
