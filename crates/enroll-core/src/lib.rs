//! Enrollment Core Library
//!
//! Two-tier student storage: a hosted document database reached over HTTP,
//! with an in-process store that takes over whenever the remote cannot give
//! a clean answer. [`StudentDirectory`] is the single entry point.

// Re-export pure types from enroll-types
pub use enroll_types::*;

pub mod directory;
pub mod error;
pub mod ports;
pub mod storage;

pub use directory::StudentDirectory;
pub use error::{EnrollError, Result};
pub use ports::{FallbackReason, Remote, StudentBackend, VendorReply};
pub use storage::{FallbackStore, VendorClient, VendorConfig};
