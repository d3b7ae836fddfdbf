use std::time::Duration;

use reqwest::{
    header::{CONTENT_TYPE, COOKIE},
    Method, RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    domain::{
        ActivityTypes, CreateTimesheetResponse, CurrentUser, DateFilter, ErrorBody, LoginRequest,
        ProfileResponse, Project, ProjectList, Timesheet, TimesheetList, TimesheetPayload,
        TimesheetUpdatePayload, UserProfile,
    },
    ApiURL, Credentials, CSRF_COOKIE, CSRF_HEADER, SESSION_COOKIE,
};

/// HTTP client for the timesheet REST backend.
///
/// The client is cheap to clone; requests carry the session cookie of the
/// credentials it was built with.
#[derive(Debug, Clone)]
pub struct TimesheetClient {
    client: reqwest::Client,
    base: ApiURL,
    credentials: Option<Credentials>,
}

impl TimesheetClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        reqwest::Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base: ApiURL::new(base_url),
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    fn request(&self, method: Method, url: &ApiURL) -> RequestBuilder {
        let unsafe_method = method != Method::GET;
        let mut builder = self.client.request(method, url.as_ref());

        if let Some(credentials) = &self.credentials {
            builder = builder.header(COOKIE, credentials.as_cookie_header());
            if unsafe_method {
                if let Some(token) = &credentials.csrf_token {
                    builder = builder.header(CSRF_HEADER, token);
                }
            }
        }

        builder
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, ApiError> {
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::ResponseError(format!("{} failed: {}", call_name, e)))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        if status.is_client_error() {
            let is_json = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("json"));
            let body = if is_json {
                resp.json::<ErrorBody>().await.unwrap_or_default()
            } else {
                ErrorBody::default()
            };

            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: body
                    .into_message()
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            });
        }

        if !status.is_success() {
            return Err(ApiError::ResponseError(format!(
                "{} returned HTTP {}",
                call_name, status
            )));
        }

        Ok(resp)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, ApiError> {
        let resp = self.send(request, call_name).await?;

        resp.json::<T>().await.map_err(|e| {
            ApiError::ParsingError(format!("Failed to parse {} response: {}", call_name, e))
        })
    }

    /// Log in with email and password and return the issued session.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Credentials, ApiError> {
        let url = self.base.append_path("/auth/login");
        let resp = self
            .send(
                self.request(Method::POST, &url)
                    .json(&LoginRequest { email, password }),
                "POST /auth/login/",
            )
            .await?;

        let cookies = resp
            .cookies()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .filter(|(name, _)| name == SESSION_COOKIE || name == CSRF_COOKIE)
            .collect::<Vec<_>>();

        Credentials::try_from(cookies.as_slice()).map_err(|_| {
            ApiError::ParsingError("login response did not set a session cookie".to_string())
        })
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.base.append_path("/auth/logout");
        self.send(self.request(Method::POST, &url), "POST /auth/logout/")
            .await?;
        Ok(())
    }

    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let url = self.base.append_path("/auth/profile");
        let response: ProfileResponse = self
            .fetch(self.request(Method::GET, &url), "GET /auth/profile/")
            .await?;
        Ok(response.user)
    }

    pub async fn fetch_current_user(&self) -> Result<CurrentUser, ApiError> {
        let url = self.base.append_path("/timesheets/current-user");
        self.fetch(
            self.request(Method::GET, &url),
            "GET /timesheets/current-user/",
        )
        .await
    }

    pub async fn fetch_active_projects(&self) -> Result<Vec<Project>, ApiError> {
        let url = self.base.append_path("/projects/active");
        let response: ProjectList = self
            .fetch(self.request(Method::GET, &url), "GET /projects/active/")
            .await?;
        Ok(response.projects)
    }

    pub async fn fetch_project_activities(&self, project_id: i64) -> Result<Vec<String>, ApiError> {
        let url = self
            .base
            .append_path(&format!("/timesheets/project/{}/activities", project_id));
        let response: ActivityTypes = self
            .fetch(
                self.request(Method::GET, &url),
                "GET /timesheets/project/:id/activities/",
            )
            .await?;
        Ok(response.activity_types)
    }

    pub async fn fetch_my_timesheets(&self, filter: &DateFilter) -> Result<Vec<Timesheet>, ApiError> {
        let url = self
            .base
            .append_path("/timesheets/my-timesheets")
            .with_filter(filter);
        let response: TimesheetList = self
            .fetch(
                self.request(Method::GET, &url),
                "GET /timesheets/my-timesheets/",
            )
            .await?;
        Ok(response.timesheets)
    }

    /// Create a timesheet entry and return its server id.
    pub async fn create_timesheet(&self, payload: &TimesheetPayload) -> Result<i64, ApiError> {
        let url = self.base.append_path("/timesheets");
        let response: CreateTimesheetResponse = self
            .fetch(
                self.request(Method::POST, &url).json(payload),
                "POST /timesheets/",
            )
            .await?;
        Ok(response.id())
    }

    pub async fn update_timesheet(
        &self,
        id: i64,
        payload: &TimesheetUpdatePayload,
    ) -> Result<(), ApiError> {
        let url = self.base.append_path(&format!("/timesheets/{}", id));
        self.send(
            self.request(Method::PUT, &url).json(payload),
            "PUT /timesheets/:id/",
        )
        .await?;
        Ok(())
    }

    pub async fn delete_timesheet(&self, id: i64) -> Result<(), ApiError> {
        let url = self.base.append_path(&format!("/timesheets/{}", id));
        self.send(
            self.request(Method::DELETE, &url),
            "DELETE /timesheets/:id/",
        )
        .await?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("InvalidUrl: {0}")]
    InvalidUrl(String),
    #[error("Other: {0}")]
    Other(String),
}
