//! Client for the hosted document database (JsonPowerDB-style command API)
//!
//! Every operation is one JSON POST carrying the token, a command name, the
//! database and relation names and a `jsonStr` argument. Reads go to
//! [`READ_ENDPOINT`], writes to [`WRITE_ENDPOINT`]. The vendor renames every
//! field (`Roll-No`, `Full-Name`, ...), so records are translated both ways
//! here and nowhere else.

use crate::error::{EnrollError, Result};
use crate::ports::{FallbackReason, Remote, StudentBackend, VendorReply};
use async_trait::async_trait;
use enroll_types::{Student, StudentChanges};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info};

pub const READ_ENDPOINT: &str = "/api/irl";
pub const WRITE_ENDPOINT: &str = "/api/iml";

pub const DEFAULT_BASE_URL: &str = "http://api.login2explore.com:5577";
pub const DEFAULT_TOKEN: &str = "jpdb-demo-token";
pub const DEFAULT_DB_NAME: &str = "SCHOOL-DB";
pub const DEFAULT_RELATION: &str = "STUDENT-TABLE";

/// Connection settings for the vendor
#[derive(Debug, Clone)]
pub struct VendorConfig {
    pub base_url: String,
    pub token: String,
    pub db_name: String,
    pub relation: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: DEFAULT_TOKEN.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            relation: DEFAULT_RELATION.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    GetByKey,
    GetAll,
    Put,
    Update,
    Remove,
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Command::GetByKey => "GET_BY_KEY",
            Command::GetAll => "GET_ALL",
            Command::Put => "PUT",
            Command::Update => "UPDATE",
            Command::Remove => "REMOVE",
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            Command::GetByKey | Command::GetAll => READ_ENDPOINT,
            Command::Put | Command::Update | Command::Remove => WRITE_ENDPOINT,
        }
    }
}

/// A student as the vendor stores it
#[derive(Debug, Deserialize)]
struct VendorRecord {
    #[serde(rename = "Roll-No")]
    roll_no: String,
    #[serde(rename = "Full-Name", default)]
    full_name: String,
    #[serde(rename = "Class", default)]
    class: String,
    #[serde(rename = "Birth-Date", default)]
    birth_date: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "Enrollment-Date", default)]
    enrollment_date: String,
}

impl From<VendorRecord> for Student {
    fn from(record: VendorRecord) -> Self {
        Student {
            roll_no: record.roll_no,
            full_name: record.full_name,
            class: record.class,
            birth_date: record.birth_date,
            address: record.address,
            enrollment_date: record.enrollment_date,
        }
    }
}

fn record_json(student: &Student) -> Value {
    json!({
        "Roll-No": student.roll_no,
        "Full-Name": student.full_name,
        "Class": student.class,
        "Birth-Date": student.birth_date,
        "Address": student.address,
        "Enrollment-Date": student.enrollment_date,
    })
}

fn changes_json(changes: &StudentChanges) -> Value {
    json!({
        "Full-Name": changes.full_name,
        "Class": changes.class,
        "Birth-Date": changes.birth_date,
        "Address": changes.address,
        "Enrollment-Date": changes.enrollment_date,
    })
}

/// Sort a raw vendor body into an answer or a fallback reason
///
/// HTML is checked before JSON parsing: the vendor's gateway serves error
/// pages with 2xx statuses.
pub fn classify(body: &str) -> std::result::Result<VendorReply, FallbackReason> {
    if looks_like_html(body) {
        return Err(FallbackReason::HtmlErrorPage);
    }
    let value: Value =
        serde_json::from_str(body).map_err(|e| FallbackReason::MalformedBody(e.to_string()))?;
    Ok(reply_from_json(value))
}

fn looks_like_html(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("<!doctype html") || lower.contains("<html")
}

fn reply_from_json(mut value: Value) -> VendorReply {
    let status = value
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok());
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    // `data` is sometimes an object and sometimes that object JSON-encoded
    let data = match value.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => {
            Some(serde_json::from_str::<Value>(&s).unwrap_or(Value::String(s)))
        }
        Some(other) => Some(other),
    };

    VendorReply {
        status,
        message,
        data,
    }
}

fn record_from(value: &Value) -> std::result::Result<Student, String> {
    let record = value.get("record").unwrap_or(value);
    serde_json::from_value::<VendorRecord>(record.clone())
        .map(Student::from)
        .map_err(|e| e.to_string())
}

/// Pull student records out of a reply's data payload
fn records_in(data: &Value) -> std::result::Result<Vec<Student>, String> {
    match data {
        Value::Array(items) => items.iter().map(record_from).collect(),
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        Value::Object(map) => match map.get("json_records") {
            Some(Value::Array(items)) => items.iter().map(record_from).collect(),
            Some(_) => Err("json_records is not an array".to_string()),
            None => record_from(data).map(|student| vec![student]),
        },
        other => Err(format!("unexpected data payload: {}", other)),
    }
}

/// HTTP client for the vendor's command endpoints
pub struct VendorClient {
    http: ReqwestClient,
    config: VendorConfig,
}

impl VendorClient {
    pub fn new(config: VendorConfig) -> Result<Self> {
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(EnrollError::InvalidConfig(format!(
                "vendor URL must start with http:// or https://: {}",
                config.base_url
            )));
        }

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            config: VendorConfig { base_url, ..config },
        })
    }

    pub fn config(&self) -> &VendorConfig {
        &self.config
    }

    fn payload(&self, command: Command, json_str: Value) -> Value {
        json!({
            "token": self.config.token,
            "cmd": command.name(),
            "dbName": self.config.db_name,
            "rel": self.config.relation,
            "jsonStr": json_str,
        })
    }

    async fn send(&self, command: Command, json_str: Value) -> Remote<VendorReply> {
        let url = format!("{}{}", self.config.base_url, command.endpoint());
        debug!("Vendor {} -> {}", command.name(), url);

        let response = match self
            .http
            .post(&url)
            .json(&self.payload(command, json_str))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Remote::Unreachable(FallbackReason::Transport(e.to_string())),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Remote::Unreachable(FallbackReason::Transport(e.to_string())),
        };
        debug!(
            "Vendor {} answered HTTP {} ({} bytes)",
            command.name(),
            status,
            body.len()
        );

        match classify(&body) {
            Ok(reply) => Remote::Answered(reply),
            Err(reason) => Remote::Unreachable(reason),
        }
    }

    async fn write(&self, command: Command, roll_no: &str, json_str: Value) -> Remote<VendorReply> {
        let outcome = self.send(command, json_str).await;
        if let Remote::Answered(reply) = &outcome {
            info!(
                "Vendor {} roll_no={}: {} (status {:?})",
                command.name(),
                roll_no,
                reply.message,
                reply.status
            );
        }
        outcome
    }
}

#[async_trait]
impl StudentBackend for VendorClient {
    async fn fetch(&self, roll_no: &str) -> Remote<Option<Student>> {
        let reply = match self
            .send(Command::GetByKey, json!({ "Roll-No": roll_no }))
            .await
        {
            Remote::Answered(reply) => reply,
            Remote::Unreachable(reason) => return Remote::Unreachable(reason),
        };

        let Some(data) = reply.data else {
            return Remote::Answered(None);
        };
        match records_in(&data) {
            Ok(students) => Remote::Answered(students.into_iter().next()),
            Err(e) => Remote::Unreachable(FallbackReason::MalformedPayload(e)),
        }
    }

    async fn fetch_all(&self) -> Remote<Vec<Student>> {
        let reply = match self.send(Command::GetAll, json!({})).await {
            Remote::Answered(reply) => reply,
            Remote::Unreachable(reason) => return Remote::Unreachable(reason),
        };

        let Some(data) = reply.data else {
            return Remote::Answered(Vec::new());
        };
        match records_in(&data) {
            Ok(students) => Remote::Answered(students),
            Err(e) => Remote::Unreachable(FallbackReason::MalformedPayload(e)),
        }
    }

    async fn put(&self, student: &Student) -> Remote<VendorReply> {
        self.write(Command::Put, &student.roll_no, record_json(student))
            .await
    }

    async fn update(&self, roll_no: &str, changes: &StudentChanges) -> Remote<VendorReply> {
        let mut keyed = Map::new();
        keyed.insert(roll_no.to_string(), changes_json(changes));
        self.write(Command::Update, roll_no, Value::Object(keyed))
            .await
    }

    async fn remove(&self, roll_no: &str) -> Remote<VendorReply> {
        self.write(Command::Remove, roll_no, json!({ "Roll-No": roll_no }))
            .await
    }
}
