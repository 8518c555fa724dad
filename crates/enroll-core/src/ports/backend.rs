//! Authoritative student backend trait and its tagged outcomes

use async_trait::async_trait;
use enroll_types::{Student, StudentChanges};
use serde_json::Value;
use thiserror::Error;

/// Why a remote call could not produce an authoritative answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Connection refused, DNS failure, timeout, truncated body
    #[error("transport failure: {0}")]
    Transport(String),
    /// The vendor answered with an HTML error page
    #[error("vendor returned an HTML page")]
    HtmlErrorPage,
    /// The body was not JSON
    #[error("unparseable body: {0}")]
    MalformedBody(String),
    /// The body was JSON but its data payload is not a student record
    #[error("unparseable data payload: {0}")]
    MalformedPayload(String),
}

/// Outcome of one remote call
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    /// The remote store answered; `T` is its answer
    Answered(T),
    /// The remote store could not be consulted; the fallback store decides
    Unreachable(FallbackReason),
}

impl<T> Remote<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Remote<U> {
        match self {
            Remote::Answered(value) => Remote::Answered(f(value)),
            Remote::Unreachable(reason) => Remote::Unreachable(reason),
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Remote::Unreachable(_))
    }
}

/// A parsed vendor reply
#[derive(Debug, Clone, PartialEq)]
pub struct VendorReply {
    pub status: Option<u16>,
    pub message: String,
    /// `data` with JSON-in-a-string unwrapped; `None` when absent or empty
    pub data: Option<Value>,
}

impl VendorReply {
    pub fn success() -> Self {
        Self {
            status: Some(200),
            message: "success".to_string(),
            data: None,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            data: None,
        }
    }

    /// The vendor's only success signal is its message text
    pub fn succeeded(&self) -> bool {
        self.message.contains("success")
    }
}

/// The authoritative (remote) student store
///
/// Implementations never fail: every transport or decoding problem is
/// reported as [`Remote::Unreachable`].
#[async_trait]
pub trait StudentBackend: Send + Sync {
    /// Look a student up by roll number; `Answered(None)` when absent
    async fn fetch(&self, roll_no: &str) -> Remote<Option<Student>>;

    async fn fetch_all(&self) -> Remote<Vec<Student>>;

    /// Write a complete new record
    async fn put(&self, student: &Student) -> Remote<VendorReply>;

    /// Overwrite the mutable fields of an existing record
    async fn update(&self, roll_no: &str, changes: &StudentChanges) -> Remote<VendorReply>;

    async fn remove(&self, roll_no: &str) -> Remote<VendorReply>;
}
