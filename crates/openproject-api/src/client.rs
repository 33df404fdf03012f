//! HTTP client for the OpenProject REST API.
//!
//! A thin, stateless pass-through: every call builds one authenticated
//! request, and any non-success response surfaces as an error carrying
//! the upstream status code and response body text. No retries, no
//! caching, no shared mutable state beyond the immutable configuration.

use crate::config::Config;
use crate::domain::{
    Activity, Collection, Link, NewWorkPackage, Project, Status, WorkPackage, WorkPackageUpdate,
};
use crate::error::{Error, Result};
use crate::{payload, workflow};
use reqwest::{Method, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Virtual user name OpenProject expects for API-key Basic authentication.
const BASIC_AUTH_USER: &str = "apikey";

/// Page size requested when listing work packages.
const PAGE_SIZE: u32 = 100;

/// Upper bound on followed next-page links. A malfunctioning upstream
/// that always reports a next page would otherwise loop forever; hitting
/// the cap is an explicit error, never a silent truncation.
pub const MAX_PAGES: usize = 1000;

/// Client for one OpenProject instance.
pub struct OpenProjectClient {
    config: Config,
    http: reqwest::Client,
}

impl OpenProjectClient {
    /// Create a client for the configured instance.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Issue one authenticated request and parse the JSON response.
    ///
    /// All operations funnel through here: URL = base + path, Basic auth
    /// as `apikey:<key>`, JSON content type. Non-2xx responses become
    /// [`Error::Api`] with the status code and body text.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%method, %url, "OpenProject request");

        let mut request = self
            .http
            .request(method, &url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.config.api_key))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// List all projects visible to the API key.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the upstream reports a
    /// non-success status.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let page: Collection<Project> = self.request(Method::GET, "/api/v3/projects", None).await?;
        Ok(page.embedded.elements)
    }

    /// Fetch one project by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 404 when the project does not
    /// exist or is not visible.
    pub async fn get_project(&self, project_id: u64) -> Result<Project> {
        self.request(Method::GET, &format!("/api/v3/projects/{project_id}"), None)
            .await
    }

    /// List every work package in a project.
    ///
    /// Pages through the collection until the upstream stops reporting a
    /// next-page link, concatenating pages in upstream order. The link may
    /// be absolute or site-relative; either way only its path and query
    /// are reused against the configured base.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageLimit`] when more than [`MAX_PAGES`] pages are
    /// reported, and the usual request errors otherwise.
    pub async fn list_work_packages(&self, project_id: u64) -> Result<Vec<WorkPackage>> {
        let mut path = format!("/api/v3/projects/{project_id}/work_packages?pageSize={PAGE_SIZE}");
        let mut all = Vec::new();
        let mut pages = 0usize;

        loop {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(Error::PageLimit { limit: MAX_PAGES });
            }

            let page: Collection<WorkPackage> = self.request(Method::GET, &path, None).await?;
            all.extend(page.embedded.elements);

            match next_page_path(page.links.next.as_ref()) {
                Some(next) => path = next,
                None => break,
            }
        }

        debug!(project_id, pages, count = all.len(), "listed work packages");
        Ok(all)
    }

    /// Fetch one work package by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with status 404 when the work package does
    /// not exist.
    pub async fn get_work_package(&self, work_package_id: u64) -> Result<WorkPackage> {
        self.request(
            Method::GET,
            &format!("/api/v3/work_packages/{work_package_id}"),
            None,
        )
        .await
    }

    /// Create a work package bound to one project and one type.
    ///
    /// Returns the created work package including its assigned identifier
    /// and initial lock version.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the upstream rejects
    /// the payload.
    pub async fn create_work_package(
        &self,
        project_id: u64,
        new: &NewWorkPackage,
    ) -> Result<WorkPackage> {
        let body = payload::create_payload(project_id, new);
        self.request(Method::POST, "/api/v3/work_packages", Some(&body))
            .await
    }

    /// Update a work package, echoing the last observed lock version.
    ///
    /// When the update carries a target status, the workflow validator
    /// gates the call first: an illegal transition fails with the full
    /// list of alternatives and no mutating request is sent. The upstream
    /// still rejects stale lock versions with a conflict.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] for an illegal status change,
    /// or the usual request errors (including the upstream's conflict
    /// response for a stale lock version).
    pub async fn update_work_package(
        &self,
        work_package_id: u64,
        update: &WorkPackageUpdate,
        lock_version: i64,
    ) -> Result<WorkPackage> {
        if let Some(status_id) = &update.status_id {
            workflow::ensure_transition_allowed(self, work_package_id, status_id).await?;
        }

        let body = payload::update_payload(update, lock_version);
        self.request(
            Method::PATCH,
            &format!("/api/v3/work_packages/{work_package_id}"),
            Some(&body),
        )
        .await
    }

    /// Enumerate every status known to the instance.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the upstream reports a
    /// non-success status.
    pub async fn list_statuses(&self) -> Result<Vec<Status>> {
        let page: Collection<Status> = self.request(Method::GET, "/api/v3/statuses", None).await?;
        Ok(page.embedded.elements)
    }

    /// Append a markdown comment to a work package's activity stream.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the upstream reports a
    /// non-success status.
    pub async fn add_comment(&self, work_package_id: u64, comment: &str) -> Result<Activity> {
        let body = payload::comment_payload(comment);
        self.request(
            Method::POST,
            &format!("/api/v3/work_packages/{work_package_id}/activities"),
            Some(&body),
        )
        .await
    }
}

/// Extract the request path (plus query) for a next-page link.
///
/// The upstream may hand back an absolute URL or a site-relative path;
/// only path and query are kept, since the client re-applies its own
/// configured base.
fn next_page_path(next: Option<&Link>) -> Option<String> {
    let href = next?.href.as_deref()?;
    match url::Url::parse(href) {
        Ok(parsed) => {
            let mut path = parsed.path().to_string();
            if let Some(query) = parsed.query() {
                path.push('?');
                path.push_str(query);
            }
            Some(path)
        }
        // Not an absolute URL; treat it as a ready-to-use path.
        Err(_) => Some(href.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn link(href: &str) -> Link {
        Link {
            href: Some(href.to_string()),
            title: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn next_page_path_keeps_relative_hrefs() {
        let next = link("/api/v3/projects/1/work_packages?pageSize=100&offset=2");
        assert_eq!(
            next_page_path(Some(&next)).as_deref(),
            Some("/api/v3/projects/1/work_packages?pageSize=100&offset=2")
        );
    }

    #[test]
    fn next_page_path_strips_absolute_base() {
        let next = link("https://op.example.com/api/v3/projects/1/work_packages?offset=3");
        assert_eq!(
            next_page_path(Some(&next)).as_deref(),
            Some("/api/v3/projects/1/work_packages?offset=3")
        );
    }

    #[test]
    fn next_page_path_handles_absent_links() {
        assert_eq!(next_page_path(None), None);

        let null_href = Link::default();
        assert_eq!(next_page_path(Some(&null_href)), None);
    }
}
