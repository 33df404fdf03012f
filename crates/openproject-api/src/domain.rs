//! Typed views over OpenProject's HAL-style JSON payloads.
//!
//! Only the fields this adapter interprets are modeled as struct members;
//! everything else rides along in flattened maps so results round-trip
//! back out of the tool surface unchanged. Entities are opaque beyond
//! their identifiers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A HAL link: a reference to another resource by href.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Link {
    /// Target of the link. OpenProject renders unset references as `null`.
    pub href: Option<String>,

    /// Human-readable caption of the target, when the upstream provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Uninterpreted link members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A project as reported by the upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Upstream identifier. The only field this adapter interprets.
    pub id: i64,

    /// Uninterpreted attributes (name, description, timestamps, links).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A work package ("work item") as reported by the upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPackage {
    /// Upstream identifier. Immutable once created.
    pub id: i64,

    /// Short summary line.
    pub subject: String,

    /// Optimistic-concurrency counter. A mutating request must echo the
    /// version last observed; the upstream rejects stale values.
    #[serde(rename = "lockVersion", default)]
    pub lock_version: i64,

    /// Long-form description in the upstream's formattable-text shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    /// Resource references, with the status link picked out.
    #[serde(rename = "_links", default)]
    pub links: WorkPackageLinks,

    /// Uninterpreted attributes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `_links` member of a work package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkPackageLinks {
    /// Reference to the current status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Link>,

    /// Uninterpreted references (project, type, assignee, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An entry in the instance-wide status catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    /// Upstream identifier.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Uninterpreted attributes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A comment record from a work package's activity stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Upstream identifier of the activity record.
    pub id: i64,

    /// Uninterpreted attributes (comment body, user, timestamps).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a HAL collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    /// Embedded page contents. Absent means an empty page.
    #[serde(rename = "_embedded", default = "Embedded::empty")]
    pub embedded: Embedded<T>,

    /// Collection-level links, including the next-page pointer.
    #[serde(rename = "_links", default)]
    pub links: CollectionLinks,
}

/// The `_embedded` member of a collection page.
#[derive(Debug, Clone, Deserialize)]
pub struct Embedded<T> {
    /// Page elements, in upstream order.
    #[serde(default = "Vec::new")]
    pub elements: Vec<T>,
}

impl<T> Embedded<T> {
    fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }
}

/// The `_links` member of a collection page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionLinks {
    /// Link to the next page; absent on the final page.
    pub next: Option<Link>,
}

/// Identity of a status as resolved from a reference URL.
///
/// Identifiers are carried as opaque strings: they come out of the
/// trailing segment of an href and are only ever compared for text
/// equality, so non-numeric upstream identifiers flow through unharmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    /// Status identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Reference URL the identity was extracted from.
    pub href: String,
}

/// Result of querying which transitions a work package currently allows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableStatuses {
    /// The status the work package is in right now.
    pub current_status: StatusInfo,

    /// Statuses the work package may legally move to next.
    pub available_statuses: Vec<StatusInfo>,

    /// Transition summary.
    pub workflow: WorkflowSummary,
}

/// Count summary attached to a transition query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    /// Number of legal next statuses.
    pub total_available: usize,
}

/// Data for creating a work package.
///
/// A creation always binds the work package to exactly one project and
/// one type; the references are built by the payload layer.
#[derive(Debug, Clone)]
pub struct NewWorkPackage {
    /// Short summary line. The only required attribute.
    pub subject: String,

    /// Long-form description, rendered as OpenProject markdown.
    pub description: Option<String>,

    /// Work package type. Defaults to type 1 when unset.
    pub type_id: Option<u64>,

    /// User to assign the work package to.
    pub assignee_id: Option<u64>,

    /// Initial status, as an opaque identifier.
    pub status_id: Option<String>,
}

/// Partial fields for updating a work package.
#[derive(Debug, Clone, Default)]
pub struct WorkPackageUpdate {
    /// New subject, when changing it.
    pub subject: Option<String>,

    /// New description: plain text or an upstream formattable object.
    pub description: Option<Value>,

    /// Target status, as an opaque identifier. Gated by the workflow
    /// validator before any request is sent.
    pub status_id: Option<String>,
}
