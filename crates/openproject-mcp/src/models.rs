//! Tool parameter models.
//!
//! The parameter structs double as the declarative tool catalog: their
//! schemars-derived JSON schemas (with doc comments as field
//! descriptions) are what `tools/list` advertises. Results are the
//! upstream payloads themselves, pretty-printed by the server layer, so
//! no response models are needed here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments for `get_project`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetProjectParams {
    /// The ID of the project.
    pub project_id: u64,
}

/// Arguments for `list_work_packages`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListWorkPackagesParams {
    /// The ID of the project.
    pub project_id: u64,
}

/// Arguments for `get_work_package`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetWorkPackageParams {
    /// The ID of the work package.
    pub work_package_id: u64,
}

/// Arguments for `create_work_package`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateWorkPackageParams {
    /// The ID of the project.
    pub project_id: u64,

    /// The subject/title of the work package.
    pub subject: String,

    /// The description of the work package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The type ID (default: 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<u64>,

    /// The ID of the assignee user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,

    /// The ID of the status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
}

/// Arguments for `update_work_package`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateWorkPackageParams {
    /// The ID of the work package.
    pub work_package_id: u64,

    /// The lock version (required for updates; stale values are rejected
    /// by the upstream).
    pub lock_version: i64,

    /// The subject/title of the work package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// The description of the work package: plain text, or a formattable
    /// object with `format`/`raw` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    /// The ID of the status to transition to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
}

/// Arguments for `get_available_statuses`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetAvailableStatusesParams {
    /// The ID of the work package.
    pub work_package_id: u64,
}

/// Arguments for `add_comment`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddCommentParams {
    /// The ID of the work package.
    pub work_package_id: u64,

    /// The comment text (markdown).
    pub comment: String,
}
