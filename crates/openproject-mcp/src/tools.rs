//! MCP tool implementations.
//!
//! A thin mapping from the external snake_case argument shapes onto
//! [`OpenProjectClient`] operations. Results come back as plain
//! serializable domain values; the server layer owns the response
//! envelope.

use crate::error::Result;
use crate::models::{
    AddCommentParams, CreateWorkPackageParams, GetAvailableStatusesParams, GetProjectParams,
    GetWorkPackageParams, ListWorkPackagesParams, UpdateWorkPackageParams,
};
use openproject_api::OpenProjectClient;
use openproject_api::domain::{
    Activity, AvailableStatuses, NewWorkPackage, Project, Status, WorkPackage, WorkPackageUpdate,
};
use std::sync::Arc;

/// Tool implementations for the OpenProject MCP server.
pub struct Tools {
    client: Arc<OpenProjectClient>,
}

impl Tools {
    /// Create a new `Tools` instance around a shared client.
    #[must_use]
    pub fn new(client: Arc<OpenProjectClient>) -> Self {
        Self { client }
    }

    /// List all visible projects.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.client.list_projects().await?)
    }

    /// Get one project by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails.
    pub async fn get_project(&self, params: GetProjectParams) -> Result<Project> {
        Ok(self.client.get_project(params.project_id).await?)
    }

    /// List every work package in a project, across all pages.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails.
    pub async fn list_work_packages(
        &self,
        params: ListWorkPackagesParams,
    ) -> Result<Vec<WorkPackage>> {
        Ok(self.client.list_work_packages(params.project_id).await?)
    }

    /// Get one work package by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails.
    pub async fn get_work_package(&self, params: GetWorkPackageParams) -> Result<WorkPackage> {
        Ok(self.client.get_work_package(params.work_package_id).await?)
    }

    /// Create a work package in a project.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails.
    pub async fn create_work_package(
        &self,
        params: CreateWorkPackageParams,
    ) -> Result<WorkPackage> {
        let new = NewWorkPackage {
            subject: params.subject,
            description: params.description,
            type_id: params.type_id,
            assignee_id: params.assignee_id,
            status_id: params.status_id.map(|id| id.to_string()),
        };
        Ok(self
            .client
            .create_work_package(params.project_id, &new)
            .await?)
    }

    /// Update a work package, with workflow gating for status changes.
    ///
    /// # Errors
    ///
    /// Returns an error when the requested status change is not legal or
    /// the upstream call fails (including stale lock versions).
    pub async fn update_work_package(
        &self,
        params: UpdateWorkPackageParams,
    ) -> Result<WorkPackage> {
        let update = WorkPackageUpdate {
            subject: params.subject,
            description: params.description,
            status_id: params.status_id.map(|id| id.to_string()),
        };
        Ok(self
            .client
            .update_work_package(params.work_package_id, &update, params.lock_version)
            .await?)
    }

    /// Enumerate the instance-wide status catalog.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails.
    pub async fn list_statuses(&self) -> Result<Vec<Status>> {
        Ok(self.client.list_statuses().await?)
    }

    /// Resolve a work package's current status and legal next statuses.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails.
    pub async fn get_available_statuses(
        &self,
        params: GetAvailableStatusesParams,
    ) -> Result<AvailableStatuses> {
        Ok(self
            .client
            .available_statuses(params.work_package_id)
            .await?)
    }

    /// Append a markdown comment to a work package's activity stream.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails.
    pub async fn add_comment(&self, params: AddCommentParams) -> Result<Activity> {
        Ok(self
            .client
            .add_comment(params.work_package_id, &params.comment)
            .await?)
    }
}
