//! Integration tests for the OpenProject MCP server.
//!
//! These tests exercise the MCP tool layer against a loopback stub of the
//! OpenProject API to verify end-to-end behavior including:
//! - The work package lifecycle (create -> update -> comment)
//! - Workflow queries and transition gating
//! - Error surfacing through the tool boundary

use openproject_api::{Config, OpenProjectClient};
use openproject_mcp::models::{
    AddCommentParams, CreateWorkPackageParams, GetAvailableStatusesParams, GetProjectParams,
    ListWorkPackagesParams, UpdateWorkPackageParams,
};
use openproject_mcp::tools::Tools;
use serde_json::{Value, json};
use std::sync::Arc;

mod helpers {
    use axum::Router;
    use axum::body::Body;
    use axum::extract::State;
    use axum::http::{Request, StatusCode};
    use axum::response::{IntoResponse, Response};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory stub of the upstream REST API, keyed by
    /// `"<METHOD> <path?query>"`.
    #[derive(Clone, Default)]
    pub struct Upstream {
        responses: Arc<Mutex<HashMap<String, (u16, Value)>>>,
        requests: Arc<Mutex<Vec<(String, Value)>>>,
    }

    impl Upstream {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, key: &str, status: u16, body: Value) {
            self.responses
                .lock()
                .unwrap()
                .insert(key.to_string(), (status, body));
        }

        /// Recorded `(key, body)` pairs in arrival order.
        pub fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().unwrap().clone()
        }

        pub async fn serve(&self) -> String {
            let app = Router::new().fallback(handle).with_state(self.clone());
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{addr}")
        }
    }

    async fn handle(State(upstream): State<Upstream>, request: Request<Body>) -> Response {
        let method = request.method().to_string();
        let path_and_query = request
            .uri()
            .path_and_query()
            .map(ToString::to_string)
            .unwrap_or_default();
        let key = format!("{method} {path_and_query}");

        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        upstream.requests.lock().unwrap().push((key.clone(), body));

        let canned = upstream.responses.lock().unwrap().get(&key).cloned();
        match canned {
            Some((status, body)) => {
                (StatusCode::from_u16(status).unwrap(), axum::Json(body)).into_response()
            }
            None => (
                StatusCode::NOT_FOUND,
                format!("no stubbed response for {key}"),
            )
                .into_response(),
        }
    }
}

use helpers::Upstream;

fn tools_for(base_url: &str) -> Tools {
    let config = Config::new(base_url, "test-key").unwrap();
    Tools::new(Arc::new(OpenProjectClient::new(config)))
}

fn work_package(id: i64, subject: &str, status_href: &str, status_title: &str) -> Value {
    json!({
        "id": id,
        "subject": subject,
        "lockVersion": 5,
        "_links": {
            "status": { "href": status_href, "title": status_title }
        }
    })
}

#[tokio::test]
async fn get_project_round_trips_the_upstream_payload() {
    let upstream = Upstream::new();
    upstream.respond(
        "GET /api/v3/projects/3",
        200,
        json!({ "id": 3, "name": "Gamma", "identifier": "gamma" }),
    );
    let base = upstream.serve().await;

    let project = tools_for(&base)
        .get_project(GetProjectParams { project_id: 3 })
        .await
        .unwrap();

    let rendered = serde_json::to_value(&project).unwrap();
    assert_eq!(rendered["id"], 3);
    assert_eq!(rendered["name"], "Gamma");
    assert_eq!(rendered["identifier"], "gamma");
}

#[tokio::test]
async fn work_package_lifecycle_create_update_comment() {
    let upstream = Upstream::new();
    upstream.respond(
        "POST /api/v3/work_packages",
        201,
        work_package(42, "Implement login", "/api/v3/statuses/1", "New"),
    );
    upstream.respond(
        "GET /api/v3/work_packages/42",
        200,
        work_package(42, "Implement login", "/api/v3/statuses/1", "New"),
    );
    upstream.respond(
        "GET /api/v3/work_packages/42/form",
        200,
        json!({
            "_embedded": {
                "schema": {
                    "status": {
                        "_links": {
                            "allowedValues": [
                                { "href": "/api/v3/statuses/2", "title": "In progress" }
                            ]
                        }
                    }
                }
            }
        }),
    );
    upstream.respond(
        "PATCH /api/v3/work_packages/42",
        200,
        work_package(42, "Implement login", "/api/v3/statuses/2", "In progress"),
    );
    upstream.respond(
        "POST /api/v3/work_packages/42/activities",
        201,
        json!({ "id": 9, "comment": { "format": "markdown", "raw": "Started" } }),
    );
    let base = upstream.serve().await;
    let tools = tools_for(&base);

    let created = tools
        .create_work_package(CreateWorkPackageParams {
            project_id: 7,
            subject: "Implement login".to_string(),
            description: Some("OAuth flow".to_string()),
            type_id: None,
            assignee_id: None,
            status_id: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(created.lock_version, 5);

    let updated = tools
        .update_work_package(UpdateWorkPackageParams {
            work_package_id: 42,
            lock_version: 5,
            subject: None,
            description: None,
            status_id: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(
        updated.links.status.as_ref().and_then(|s| s.title.as_deref()),
        Some("In progress")
    );

    let activity = tools
        .add_comment(AddCommentParams {
            work_package_id: 42,
            comment: "Started".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(activity.id, 9);

    // The PATCH carried the lock version and the translated status link.
    let patch = upstream
        .requests()
        .into_iter()
        .find(|(key, _)| key == "PATCH /api/v3/work_packages/42")
        .expect("PATCH should have been sent");
    assert_eq!(patch.1["lockVersion"], 5);
    assert_eq!(patch.1["_links"]["status"]["href"], "/api/v3/statuses/2");
    assert!(patch.1.get("statusId").is_none());
}

#[tokio::test]
async fn rejected_transition_surfaces_alternatives_and_sends_no_patch() {
    let upstream = Upstream::new();
    upstream.respond(
        "GET /api/v3/work_packages/42",
        200,
        work_package(42, "Task", "/api/v3/statuses/1", "New"),
    );
    upstream.respond(
        "GET /api/v3/work_packages/42/form",
        200,
        json!({
            "_embedded": {
                "schema": {
                    "status": { "_links": { "allowedValues": [] } }
                }
            }
        }),
    );
    let base = upstream.serve().await;

    let err = tools_for(&base)
        .update_work_package(UpdateWorkPackageParams {
            work_package_id: 42,
            lock_version: 5,
            subject: None,
            description: None,
            status_id: Some(9),
        })
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("'New' (id 1)"));
    assert!(message.contains("Available transitions: none"));
    assert!(
        !upstream
            .requests()
            .iter()
            .any(|(key, _)| key.starts_with("PATCH"))
    );
}

#[tokio::test]
async fn available_statuses_example_shape() {
    let upstream = Upstream::new();
    upstream.respond(
        "GET /api/v3/work_packages/42",
        200,
        work_package(42, "Task", "/api/v3/statuses/1", "New"),
    );
    upstream.respond(
        "GET /api/v3/work_packages/42/form",
        200,
        json!({
            "_embedded": {
                "schema": {
                    "status": {
                        "_links": {
                            "allowedValues": [
                                { "href": "/api/v3/statuses/2", "title": "In progress" }
                            ]
                        }
                    }
                }
            }
        }),
    );
    let base = upstream.serve().await;

    let state = tools_for(&base)
        .get_available_statuses(GetAvailableStatusesParams {
            work_package_id: 42,
        })
        .await
        .unwrap();

    let rendered = serde_json::to_value(&state).unwrap();
    assert_eq!(rendered["currentStatus"]["id"], "1");
    assert_eq!(rendered["currentStatus"]["name"], "New");
    assert_eq!(rendered["availableStatuses"][0]["id"], "2");
    assert_eq!(rendered["availableStatuses"][0]["name"], "In progress");
    assert_eq!(rendered["workflow"]["totalAvailable"], 1);
}

#[tokio::test]
async fn paginated_listing_is_concatenated_for_the_tool_surface() {
    let upstream = Upstream::new();
    upstream.respond(
        "GET /api/v3/projects/7/work_packages?pageSize=100",
        200,
        json!({
            "_embedded": { "elements": [work_package(1, "a", "/api/v3/statuses/1", "New")] },
            "_links": {
                "next": { "href": "/api/v3/projects/7/work_packages?pageSize=100&offset=2" }
            }
        }),
    );
    upstream.respond(
        "GET /api/v3/projects/7/work_packages?pageSize=100&offset=2",
        200,
        json!({
            "_embedded": { "elements": [work_package(2, "b", "/api/v3/statuses/1", "New")] }
        }),
    );
    let base = upstream.serve().await;

    let items = tools_for(&base)
        .list_work_packages(ListWorkPackagesParams { project_id: 7 })
        .await
        .unwrap();
    let ids: Vec<i64> = items.iter().map(|wp| wp.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn upstream_error_text_reaches_the_tool_boundary() {
    let upstream = Upstream::new();
    upstream.respond(
        "GET /api/v3/projects/99",
        403,
        json!({ "message": "You are not authorized" }),
    );
    let base = upstream.serve().await;

    let err = tools_for(&base)
        .get_project(GetProjectParams { project_id: 99 })
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("OpenProject API 403:"));
    assert!(message.contains("You are not authorized"));
}
