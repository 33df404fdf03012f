//! Payload construction for mutating work package calls.
//!
//! Project, type, assignee, and status are always bound by `_links`
//! references, never embedded objects, and descriptions travel in the
//! upstream's formattable-text shape.

use crate::domain::{NewWorkPackage, WorkPackageUpdate};
use serde_json::{Map, Value, json};

/// Type reference used when a creation does not name one.
const DEFAULT_TYPE_ID: u64 = 1;

/// Build the POST body for creating a work package.
///
/// The type reference falls back to type [`DEFAULT_TYPE_ID`]; assignee and
/// status links are omitted entirely when unset.
#[must_use]
pub fn create_payload(project_id: u64, new: &NewWorkPackage) -> Value {
    let mut links = Map::new();
    links.insert(
        "project".to_string(),
        json!({ "href": format!("/api/v3/projects/{project_id}") }),
    );
    links.insert(
        "type".to_string(),
        json!({ "href": format!("/api/v3/types/{}", new.type_id.unwrap_or(DEFAULT_TYPE_ID)) }),
    );
    if let Some(assignee_id) = new.assignee_id {
        links.insert(
            "assignee".to_string(),
            json!({ "href": format!("/api/v3/users/{assignee_id}") }),
        );
    }
    if let Some(status_id) = &new.status_id {
        links.insert(
            "status".to_string(),
            json!({ "href": format!("/api/v3/statuses/{status_id}") }),
        );
    }

    let mut payload = Map::new();
    payload.insert("subject".to_string(), Value::String(new.subject.clone()));
    if let Some(description) = &new.description {
        payload.insert("description".to_string(), formatted_text(description));
    }
    payload.insert("_links".to_string(), Value::Object(links));
    Value::Object(payload)
}

/// Build the PATCH body for updating a work package.
///
/// `lock_version` is always merged in; the upstream uses it to detect
/// conflicting concurrent edits. A target status becomes a
/// `_links.status` reference; the flat `statusId` field never appears in
/// the payload.
#[must_use]
pub fn update_payload(update: &WorkPackageUpdate, lock_version: i64) -> Value {
    let mut payload = Map::new();
    payload.insert("lockVersion".to_string(), json!(lock_version));
    if let Some(subject) = &update.subject {
        payload.insert("subject".to_string(), Value::String(subject.clone()));
    }
    if let Some(description) = &update.description {
        payload.insert(
            "description".to_string(),
            normalize_description(description),
        );
    }
    if let Some(status_id) = &update.status_id {
        payload.insert(
            "_links".to_string(),
            json!({ "status": { "href": format!("/api/v3/statuses/{status_id}") } }),
        );
    }
    Value::Object(payload)
}

/// Build the POST body for appending a comment to an activity stream.
#[must_use]
pub fn comment_payload(text: &str) -> Value {
    json!({ "comment": formatted_text(text) })
}

/// Wrap plain text in the upstream's formattable-text shape.
fn formatted_text(raw: &str) -> Value {
    json!({ "format": "markdown", "raw": raw })
}

/// Normalize a description into the formattable-text shape.
///
/// Plain strings are wrapped verbatim. Objects keep their fields but gain
/// `format: "markdown"` when missing, and a missing `raw` is backfilled
/// from an `html` member or the empty string.
#[must_use]
pub fn normalize_description(description: &Value) -> Value {
    match description {
        Value::String(raw) => formatted_text(raw),
        Value::Object(fields) => {
            let mut fields = fields.clone();
            fields
                .entry("format")
                .or_insert_with(|| Value::String("markdown".to_string()));
            if !fields.contains_key("raw") {
                let backfill = fields
                    .get("html")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                fields.insert("raw".to_string(), Value::String(backfill));
            }
            Value::Object(fields)
        }
        other => other.clone(),
    }
}
