//! API client for the Student Enrollment server

use anyhow::{Context, Result};
use enroll_types::{
    CreateStudentRequest, ExistsResponse, MessageResponse, NewStudent, StatsResponse, Student,
    StudentChanges, StudentListResponse, StudentResponse, UpdateStudentRequest,
};
use reqwest::{Client as ReqwestClient, Response, StatusCode, Url};
use tracing::debug;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

pub struct Client {
    http: ReqwestClient,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: ReqwestClient::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `<base>/api/<segments..>` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid server URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid server URL: {}", self.base_url))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        debug!("Request URL: {}", url);
        Ok(url)
    }

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        let response = self
            .http
            .get(self.url(&["students"])?)
            .send()
            .await
            .context("Failed to list students")?;
        let body: StudentListResponse = ensure_success(response).await?.json().await?;
        Ok(body.students)
    }

    /// `None` when the server answers 404
    pub async fn get_student(&self, roll_no: &str) -> Result<Option<Student>> {
        let response = self
            .http
            .get(self.url(&["students", roll_no])?)
            .send()
            .await
            .context("Failed to fetch student")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: StudentResponse = ensure_success(response).await?.json().await?;
        Ok(body.student)
    }

    pub async fn student_exists(&self, roll_no: &str) -> Result<bool> {
        let response = self
            .http
            .get(self.url(&["students", roll_no, "exists"])?)
            .send()
            .await
            .context("Failed to check student")?;
        let body: ExistsResponse = ensure_success(response).await?.json().await?;
        Ok(body.exists)
    }

    pub async fn create_student(&self, draft: &NewStudent) -> Result<Student> {
        let response = self
            .http
            .post(self.url(&["students"])?)
            .json(&CreateStudentRequest {
                student: draft.clone(),
            })
            .send()
            .await
            .context("Failed to create student")?;
        let body: StudentResponse = ensure_success(response).await?.json().await?;
        body.student
            .ok_or_else(|| anyhow::anyhow!("Server did not return the created student"))
    }

    pub async fn update_student(&self, roll_no: &str, changes: &StudentChanges) -> Result<Student> {
        let response = self
            .http
            .put(self.url(&["students", roll_no])?)
            .json(&UpdateStudentRequest {
                roll_no: Some(roll_no.to_string()),
                student: changes.clone(),
            })
            .send()
            .await
            .context("Failed to update student")?;
        let body: StudentResponse = ensure_success(response).await?.json().await?;
        body.student
            .ok_or_else(|| anyhow::anyhow!("Server did not return the updated student"))
    }

    pub async fn delete_student(&self, roll_no: &str) -> Result<String> {
        let response = self
            .http
            .delete(self.url(&["students", roll_no])?)
            .send()
            .await
            .context("Failed to delete student")?;
        let body: MessageResponse = ensure_success(response).await?.json().await?;
        Ok(body.message)
    }

    pub async fn count_students(&self) -> Result<usize> {
        let response = self
            .http
            .get(self.url(&["stats"])?)
            .send()
            .await
            .context("Failed to fetch stats")?;
        let body: StatsResponse = ensure_success(response).await?.json().await?;
        Ok(body.count)
    }
}

/// Turn a non-2xx response into an error carrying the server's message
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<MessageResponse>(&body) {
        Ok(error) if error.fields.is_empty() => anyhow::bail!("{} ({})", error.message, status),
        Ok(error) => anyhow::bail!(
            "{} [{}] ({})",
            error.message,
            error.fields.join(", "),
            status
        ),
        Err(_) => anyhow::bail!("Server returned {}", status),
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}
