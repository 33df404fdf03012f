//! Status-transition validation.
//!
//! OpenProject reports the legal next statuses for a work package through
//! its form representation. This module resolves the current status from
//! the work package's status reference, reads the allowed set out of the
//! form schema, and gates status changes on membership before any
//! mutating request goes out.

use crate::client::OpenProjectClient;
use crate::domain::{AvailableStatuses, StatusInfo, WorkPackage, WorkflowSummary};
use crate::error::{Error, Result, TransitionRejected};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

/// Ordered readers for the allowed-status list in a form schema.
///
/// The upstream has shipped (at least) two shapes for the status portion
/// of the form schema; each reader understands exactly one:
///
/// 1. A direct link list:
///    `schema.status._links.allowedValues: [{href, title}, ..]`
/// 2. Embedded status objects gated behind a writability flag:
///    `schema.status.writable == true` with
///    `schema.status._embedded.allowedValues: [{name, _links.self.href}, ..]`
///
/// Readers are tried in order and the first that recognizes its shape
/// wins. When none match, the allowed set is empty.
const SCHEMA_READERS: &[fn(&Value) -> Option<Vec<StatusInfo>>] =
    &[read_linked_allowed_values, read_writable_allowed_values];

impl OpenProjectClient {
    /// Resolve a work package's current status and legal next statuses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] when the work package carries no
    /// usable status reference, or the usual request errors.
    pub async fn available_statuses(&self, work_package_id: u64) -> Result<AvailableStatuses> {
        let work_package: WorkPackage = self.get_work_package(work_package_id).await?;
        let current = current_status(&work_package)?;

        let form: Value = self
            .request(
                Method::GET,
                &format!("/api/v3/work_packages/{work_package_id}/form"),
                None,
            )
            .await?;
        let available = allowed_statuses(&form);
        debug!(
            work_package_id,
            current = %current.id,
            available = available.len(),
            "resolved workflow state"
        );

        Ok(AvailableStatuses {
            workflow: WorkflowSummary {
                total_available: available.len(),
            },
            current_status: current,
            available_statuses: available,
        })
    }
}

/// Verify that `target_status_id` is a legal move for the work package.
///
/// Staying in the current status is always allowed; any other target must
/// appear in the upstream-reported allowed set. The rejection error names
/// the current status and every legal alternative by name and id.
pub(crate) async fn ensure_transition_allowed(
    client: &OpenProjectClient,
    work_package_id: u64,
    target_status_id: &str,
) -> Result<()> {
    let state = client.available_statuses(work_package_id).await?;
    validate_transition(&state, target_status_id)
}

/// Pure membership check behind [`ensure_transition_allowed`].
fn validate_transition(state: &AvailableStatuses, target_status_id: &str) -> Result<()> {
    // Re-asserting the current status is a no-op and always permitted.
    if state.current_status.id == target_status_id {
        return Ok(());
    }
    if state
        .available_statuses
        .iter()
        .any(|status| status.id == target_status_id)
    {
        return Ok(());
    }
    Err(Error::InvalidTransition(TransitionRejected {
        requested: target_status_id.to_string(),
        current: state.current_status.clone(),
        allowed: state.available_statuses.clone(),
    }))
}

/// Identity of the work package's current status, from its status link.
fn current_status(work_package: &WorkPackage) -> Result<StatusInfo> {
    let href = work_package
        .links
        .status
        .as_ref()
        .and_then(|link| link.href.as_deref());
    let Some(href) = href else {
        return Err(Error::Malformed(format!(
            "work package {} has no status reference",
            work_package.id
        )));
    };

    let id = trailing_segment(href).ok_or_else(|| {
        Error::Malformed(format!("status reference '{href}' has no identifier"))
    })?;
    let name = work_package
        .links
        .status
        .as_ref()
        .and_then(|link| link.title.clone())
        .unwrap_or_else(|| id.to_string());

    Ok(StatusInfo {
        id: id.to_string(),
        name,
        href: href.to_string(),
    })
}

/// Read the allowed-status list out of a form payload.
fn allowed_statuses(form: &Value) -> Vec<StatusInfo> {
    let Some(status_schema) = form
        .pointer("/_embedded/schema/status")
        .or_else(|| form.pointer("/schema/status"))
    else {
        return Vec::new();
    };
    SCHEMA_READERS
        .iter()
        .find_map(|read| read(status_schema))
        .unwrap_or_default()
}

/// Shape 1: a plain `_links.allowedValues` link list.
fn read_linked_allowed_values(status_schema: &Value) -> Option<Vec<StatusInfo>> {
    let values = status_schema.pointer("/_links/allowedValues")?.as_array()?;
    Some(values.iter().filter_map(status_from_link).collect())
}

/// Shape 2: embedded status objects, honored only when the field is
/// writable in the work package's current state.
fn read_writable_allowed_values(status_schema: &Value) -> Option<Vec<StatusInfo>> {
    if !status_schema
        .get("writable")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        return None;
    }
    let values = status_schema
        .pointer("/_embedded/allowedValues")?
        .as_array()?;
    Some(values.iter().filter_map(status_from_embedded).collect())
}

fn status_from_link(value: &Value) -> Option<StatusInfo> {
    let href = value.get("href")?.as_str()?;
    let id = trailing_segment(href)?;
    let name = value.get("title").and_then(Value::as_str).unwrap_or(id);
    Some(StatusInfo {
        id: id.to_string(),
        name: name.to_string(),
        href: href.to_string(),
    })
}

fn status_from_embedded(value: &Value) -> Option<StatusInfo> {
    let href = value.pointer("/_links/self/href")?.as_str()?;
    let id = trailing_segment(href)?;
    let name = value.get("name").and_then(Value::as_str).unwrap_or(id);
    Some(StatusInfo {
        id: id.to_string(),
        name: name.to_string(),
        href: href.to_string(),
    })
}

/// Last path segment of a reference URL, treated as an opaque identifier.
///
/// Identifiers are only ever compared for text equality; nothing here
/// assumes numeric form.
fn trailing_segment(href: &str) -> Option<&str> {
    let segment = href.trim_end_matches('/').rsplit('/').next()?;
    (!segment.is_empty()).then_some(segment)
}
