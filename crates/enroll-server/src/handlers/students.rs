//! Student handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use enroll_core::{
    validate_roll_no, CreateStudentRequest, ExistsResponse, MessageResponse, StatsResponse,
    StudentListResponse, StudentResponse, UpdateStudentRequest, ValidationError,
};
use tracing::{error, info};

fn found(student: enroll_core::Student) -> Json<StudentResponse> {
    Json(StudentResponse {
        success: true,
        student: Some(student),
    })
}

pub async fn list(State(state): State<AppState>) -> Json<StudentListResponse> {
    let students = state.directory.get_all().await;
    Json(StudentListResponse {
        success: true,
        students,
    })
}

pub async fn get(
    State(state): State<AppState>,
    Path(roll_no): Path<String>,
) -> Result<Json<StudentResponse>, ApiError> {
    let roll_no = validate_roll_no(&roll_no)?;

    match state.directory.get(roll_no).await {
        Some(student) => Ok(found(student)),
        None => Err(ApiError::NotFound(roll_no.to_string())),
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    let Json(req) = payload?;
    req.student.validate()?;
    let draft = req.student.normalize();
    let roll_no = draft.roll_no.clone();
    info!("Enrollment request for roll_no={}", roll_no);

    if state.directory.exists(&roll_no).await {
        return Err(ApiError::Conflict(roll_no));
    }

    match state.directory.create(draft).await {
        Some(student) => Ok((StatusCode::CREATED, found(student))),
        None => {
            error!("Failed to create student {}", roll_no);
            Err(ApiError::Internal(format!(
                "Failed to create student {}",
                roll_no
            )))
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(roll_no): Path<String>,
    payload: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<Json<StudentResponse>, ApiError> {
    let roll_no = validate_roll_no(&roll_no)?.to_string();
    let Json(req) = payload?;

    // Roll numbers are immutable; an echoed one must match the path
    if let Some(body_roll_no) = req
        .roll_no
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
    {
        if body_roll_no != roll_no {
            return Err(ValidationError::RollNoMismatch {
                path: roll_no,
                body: body_roll_no.to_string(),
            }
            .into());
        }
    }
    req.student.validate()?;

    if !state.directory.exists(&roll_no).await {
        return Err(ApiError::NotFound(roll_no));
    }

    match state
        .directory
        .update(&roll_no, req.student.normalize())
        .await
    {
        Some(student) => Ok(found(student)),
        None => {
            error!("Failed to update student {}", roll_no);
            Err(ApiError::Internal(format!(
                "Failed to update student {}",
                roll_no
            )))
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(roll_no): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let roll_no = validate_roll_no(&roll_no)?;

    if !state.directory.exists(roll_no).await {
        return Err(ApiError::NotFound(roll_no.to_string()));
    }

    if state.directory.delete(roll_no).await {
        Ok(Json(MessageResponse::ok(format!(
            "Student {} deleted",
            roll_no
        ))))
    } else {
        error!("Failed to delete student {}", roll_no);
        Err(ApiError::Internal(format!(
            "Failed to delete student {}",
            roll_no
        )))
    }
}

pub async fn exists(
    State(state): State<AppState>,
    Path(roll_no): Path<String>,
) -> Result<Json<ExistsResponse>, ApiError> {
    let roll_no = validate_roll_no(&roll_no)?;
    let exists = state.directory.exists(roll_no).await;
    Ok(Json(ExistsResponse {
        success: true,
        exists,
    }))
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let count = state.directory.count().await;
    Json(StatsResponse {
        success: true,
        count,
    })
}

#[cfg(test)]
mod tests {
    use crate::{router, AppState};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use enroll_core::{
        today, FallbackStore, Remote, Student, StudentBackend, StudentChanges, StudentDirectory,
        VendorClient, VendorConfig, VendorReply,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// App whose vendor is a closed local port, so every call falls back
    fn offline_app() -> Router {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let vendor = VendorClient::new(VendorConfig {
            base_url: format!("http://{}", addr),
            ..VendorConfig::default()
        })
        .unwrap();
        app_with(Arc::new(vendor))
    }

    fn app_with(backend: Arc<dyn StudentBackend>) -> Router {
        let directory = StudentDirectory::new(backend, Arc::new(FallbackStore::new()));
        router(
            AppState {
                directory: Arc::new(directory),
            },
            None,
        )
    }

    /// Reachable vendor that finds nothing and refuses every write
    struct RefusingBackend;

    #[async_trait]
    impl StudentBackend for RefusingBackend {
        async fn fetch(&self, _roll_no: &str) -> Remote<Option<Student>> {
            Remote::Answered(None)
        }

        async fn fetch_all(&self) -> Remote<Vec<Student>> {
            Remote::Answered(Vec::new())
        }

        async fn put(&self, _student: &Student) -> Remote<VendorReply> {
            Remote::Answered(VendorReply::failure(500, "Internal vendor error"))
        }

        async fn update(&self, _roll_no: &str, _changes: &StudentChanges) -> Remote<VendorReply> {
            Remote::Answered(VendorReply::failure(500, "Internal vendor error"))
        }

        async fn remove(&self, _roll_no: &str) -> Remote<VendorReply> {
            Remote::Answered(VendorReply::failure(500, "Internal vendor error"))
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = tokio_test::assert_ok!(app.clone().oneshot(request).await);
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn ananya() -> Value {
        json!({"student": {
            "rollNo": "101",
            "fullName": "Ananya Sharma",
            "class": "10A",
            "birthDate": "2007-09-15",
            "address": "Pune, MH"
        }})
    }

    fn ananya_update(enrollment_date: &str) -> Value {
        json!({"rollNo": "101", "student": {
            "fullName": "Ananya Sharma",
            "class": "10A",
            "birthDate": "2007-09-15",
            "address": "Pune, MH",
            "enrollmentDate": enrollment_date
        }})
    }

    #[tokio::test]
    async fn test_health() {
        let app = offline_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_empty_list_is_an_array() {
        let app = offline_app();
        let (status, body) = send(&app, "GET", "/api/students", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["students"], json!([]));
    }

    #[tokio::test]
    async fn test_create_get_and_conflict() {
        let app = offline_app();

        let (status, body) = send(&app, "POST", "/api/students", Some(ananya())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["student"]["rollNo"], "101");
        assert_eq!(body["student"]["enrollmentDate"], today());

        let (status, body) = send(&app, "GET", "/api/students/101", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["student"]["fullName"], "Ananya Sharma");

        let mut duplicate = ananya();
        duplicate["student"]["fullName"] = json!("Someone Else");
        let (status, body) = send(&app, "POST", "/api/students", Some(duplicate)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (_, body) = send(&app, "GET", "/api/students/101", None).await;
        assert_eq!(body["student"]["fullName"], "Ananya Sharma");
    }

    #[tokio::test]
    async fn test_birth_date_is_stored_as_given() {
        let app = offline_app();
        let body = json!({"student": {
            "rollNo": "7",
            "fullName": "Ravi",
            "class": "9B",
            "birthDate": "15 Sept 2007",
            "address": "Nagpur"
        }});

        let (status, body) = send(&app, "POST", "/api/students", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["student"]["birthDate"], "15 Sept 2007");
    }

    #[tokio::test]
    async fn test_create_reports_missing_fields() {
        let app = offline_app();
        let body = json!({"student": {"rollNo": "5", "fullName": "  "}});

        let (status, body) = send(&app, "POST", "/api/students", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["fields"],
            json!(["fullName", "class", "birthDate", "address"])
        );
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_body() {
        let app = offline_app();
        let (status, body) = send(&app, "POST", "/api/students", Some(json!({"rollNo": "5"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_update_scenario() {
        let app = offline_app();

        let (status, _) = send(&app, "PUT", "/api/students/101", Some(ananya_update("2024-06-01"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(&app, "POST", "/api/students", Some(ananya())).await;
        let (status, body) = send(&app, "PUT", "/api/students/101", Some(ananya_update("2024-06-01"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["student"]["enrollmentDate"], "2024-06-01");

        let (_, body) = send(&app, "GET", "/api/students/101", None).await;
        assert_eq!(body["student"]["enrollmentDate"], "2024-06-01");
    }

    #[tokio::test]
    async fn test_update_rejects_roll_no_change_and_bad_dates() {
        let app = offline_app();
        send(&app, "POST", "/api/students", Some(ananya())).await;

        let mut moved = ananya_update("2024-06-01");
        moved["rollNo"] = json!("202");
        let (status, body) = send(&app, "PUT", "/api/students/101", Some(moved)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"], json!(["rollNo"]));

        let (status, body) =
            send(&app, "PUT", "/api/students/101", Some(ananya_update("June 1st"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"], json!(["enrollmentDate"]));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let app = offline_app();
        send(&app, "POST", "/api/students", Some(ananya())).await;

        let (status, body) = send(&app, "DELETE", "/api/students/101", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = send(&app, "DELETE", "/api/students/101", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/students/101", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_roll_no_is_bad_request() {
        let app = offline_app();
        let (status, body) = send(&app, "GET", "/api/students/%20", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"], json!(["rollNo"]));
    }

    #[tokio::test]
    async fn test_exists_and_stats() {
        let app = offline_app();
        send(&app, "POST", "/api/students", Some(ananya())).await;

        let (_, body) = send(&app, "GET", "/api/students/101/exists", None).await;
        assert_eq!(body["exists"], true);
        let (_, body) = send(&app, "GET", "/api/students/999/exists", None).await;
        assert_eq!(body["exists"], false);

        let (status, body) = send(&app, "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_refused_write_is_internal_error() {
        let app = app_with(Arc::new(RefusingBackend));

        let (status, body) = send(&app, "POST", "/api/students", Some(ananya())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }
}
