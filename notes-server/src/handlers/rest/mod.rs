use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{
        CreateNoteRequest, DeleteNoteResponse, ErrorResponse, NoteResponse, UpdateNoteRequest,
    },
    service::{NoteService, NoteServiceError},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        create_note,
        update_note,
        delete_note,
        get_one_note,
        get_all_notes
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        DeleteNoteResponse,
        ErrorResponse
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/notes", get(get_all_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_one_note).put(update_note).delete(delete_note),
        )
        .with_state(service)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

fn service_error_response(e: &NoteServiceError) -> Response {
    match e {
        NoteServiceError::MissingTitle => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        NoteServiceError::NotFound(id) => {
            tracing::debug!("note {} not found", id);
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
    }
}

fn rejection_response(rejection: &JsonRejection) -> Response {
    tracing::warn!("rejected request body: {}", rejection.body_text());
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Title missing or malformed body", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(&rejection),
    };

    match service.create_note(payload).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => {
            tracing::warn!("failed to create note entry: {}", e);
            service_error_response(&e)
        }
    }
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
    payload: Result<Option<Json<UpdateNoteRequest>>, JsonRejection>,
) -> Response {
    // every field is optional, so a request without a body updates nothing
    let payload = match payload {
        Ok(Some(Json(payload))) => payload,
        Ok(None) => UpdateNoteRequest::default(),
        Err(rejection) => return rejection_response(&rejection),
    };

    match service.update_note(&id, payload).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => {
            tracing::warn!("failed to update note entry: {}", e);
            service_error_response(&e)
        }
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = DeleteNoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    match service.delete_note(&id).await {
        Ok(note) => (StatusCode::OK, Json(DeleteNoteResponse { deleted: note })).into_response(),
        Err(e) => {
            tracing::warn!("failed to delete note entry: {}", e);
            service_error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    match service.get_one_note(&id).await {
        Ok(note) => (StatusCode::OK, Json(note)).into_response(),
        Err(e) => service_error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "List of all notes", body = Vec<NoteResponse>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    (StatusCode::OK, Json(service.get_all_notes().await)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let repo = Arc::new(tokio::sync::Mutex::new(Repository::new()));
        crate::app(Arc::new(NoteService::new(repo)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }

    async fn list(app: &Router) -> Vec<Value> {
        let (status, body) = send(app, Method::GET, "/notes", None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().expect("array of notes").clone()
    }

    async fn create(app: &Router, body: Value) -> Value {
        let (status, note) = send(app, Method::POST, "/notes", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        note
    }

    #[tokio::test]
    async fn create_with_empty_title_is_rejected() {
        let app = app();

        for body in [json!({"title": "", "content": "x"}), json!({"content": "x"})] {
            let (status, body) = send(&app, Method::POST, "/notes", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "Title is required"}));
        }

        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/notes")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn created_note_is_listed_and_fetchable() {
        let app = app();
        let note = create(&app, json!({"title": "A", "content": "B"})).await;

        let id = note["id"].as_str().expect("id");
        assert!(!id.is_empty());
        assert_eq!(note["title"], "A");
        assert_eq!(note["content"], "B");

        assert_eq!(list(&app).await, vec![note.clone()]);

        let (status, fetched) = send(&app, Method::GET, &format!("/notes/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, note);
    }

    #[tokio::test]
    async fn created_ids_are_unique() {
        let app = app();
        let a = create(&app, json!({"title": "A"})).await;
        let b = create(&app, json!({"title": "A"})).await;

        assert_eq!(a["content"], "");
        assert_ne!(a["id"], b["id"]);
    }

    #[tokio::test]
    async fn get_unknown_note_is_not_found() {
        let (status, body) = send(&app(), Method::GET, "/notes/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Note not found"}));
    }

    #[tokio::test]
    async fn update_unknown_note_leaves_collection_alone() {
        let app = app();
        create(&app, json!({"title": "A", "content": "B"})).await;
        let before = list(&app).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/notes/missing",
            Some(json!({"title": "changed"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Note not found"}));
        assert_eq!(list(&app).await, before);
    }

    #[tokio::test]
    async fn update_content_only_preserves_title_and_id() {
        let app = app();
        let note = create(&app, json!({"title": "A", "content": "B"})).await;
        let id = note["id"].as_str().expect("id");

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/notes/{id}"),
            Some(json!({"content": "C"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated, json!({"id": id, "title": "A", "content": "C"}));
        assert_eq!(list(&app).await, vec![updated]);
    }

    #[tokio::test]
    async fn update_without_body_changes_nothing() {
        let app = app();
        let note = create(&app, json!({"title": "A", "content": "B"})).await;
        let id = note["id"].as_str().expect("id");

        let (status, body) = send(&app, Method::PUT, "/notes/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Note not found"}));

        let (status, updated) = send(&app, Method::PUT, &format!("/notes/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated, note);
        assert_eq!(list(&app).await, vec![note]);
    }

    #[tokio::test]
    async fn update_with_malformed_body_is_a_bad_request() {
        let app = app();
        let note = create(&app, json!({"title": "A", "content": "B"})).await;
        let id = note["id"].as_str().expect("id");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri(format!("/notes/{id}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"title\":"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(list(&app).await, vec![note]);
    }

    #[tokio::test]
    async fn update_with_empty_title_keeps_old_title() {
        let app = app();
        let note = create(&app, json!({"title": "A", "content": "B"})).await;
        let id = note["id"].as_str().expect("id");

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/notes/{id}"),
            Some(json!({"title": "", "content": null})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated, note);
    }

    #[tokio::test]
    async fn delete_returns_record_then_not_found() {
        let app = app();
        let keep = create(&app, json!({"title": "keep"})).await;
        let gone = create(&app, json!({"title": "gone", "content": "bye"})).await;
        let uri = format!("/notes/{}", gone["id"].as_str().expect("id"));

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"deleted": gone}));
        assert_eq!(list(&app).await, vec![keep]);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Note not found"}));
    }

    #[tokio::test]
    async fn root_returns_welcome_text() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert!(String::from_utf8_lossy(&body).contains("/notes"));
    }

    #[tokio::test]
    async fn cross_origin_requests_are_allowed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/notes")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
