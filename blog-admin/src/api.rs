//! REST client for the blog backend
//!
//! One [`ResourceClient`] per entity type issues the five CRUD calls against
//! `{base_url}{T::RESOURCE}`. [`ResourceClient::perform`] runs the call an
//! intent action asked for and turns its outcome into the matching result
//! action, so effect handlers never look at HTTP details.

use std::marker::PhantomData;

use blog_admin_core::{Entity, EntityAction, ErrorPayload, ListQuery, Page, RemoteCall};
use chrono::Utc;
use reqwest::header::HeaderMap;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{Blog, BlogEntry, Tag};

/// Failure of a single REST call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout...
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: String,
    },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl From<ApiError> for ErrorPayload {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(e) => {
                let payload = ErrorPayload::new(e.to_string());
                match e.status() {
                    Some(status) => payload.with_status(status.as_u16()),
                    None => payload,
                }
            }
            invalid @ ApiError::InvalidUrl { .. } => ErrorPayload::new(invalid.to_string()),
            ApiError::Status {
                status,
                message,
                body,
            } => ErrorPayload::new(message).with_status(status).with_body(body),
            ApiError::Deserialization { message, body } => {
                ErrorPayload::new(format!("invalid response: {}", message)).with_body(body)
            }
        }
    }
}

/// Parse a base URL, making sure it ends with `/` so resource paths join
/// beneath it instead of replacing its last segment.
pub fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })
}

/// CRUD calls for one entity type.
pub struct ResourceClient<T> {
    http: reqwest::Client,
    resource_url: Url,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            resource_url: self.resource_url.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(http: reqwest::Client, base_url: &Url) -> Result<Self, ApiError> {
        let resource_url = base_url
            .join(T::RESOURCE)
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{}", base_url, T::RESOURCE),
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            resource_url,
            _entity: PhantomData,
        })
    }

    pub fn resource_url(&self) -> &Url {
        &self.resource_url
    }

    fn item_url(&self, id: i64) -> Url {
        let mut url = self.resource_url.clone();
        // A base URL that parsed as a hierarchical http(s) URL always has
        // path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    /// `GET {resource}?page&size&sort&cacheBuster`
    pub async fn list(&self, query: &ListQuery) -> Result<Page<T>, ApiError> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("size", query.size.to_string()),
        ];
        if let Some(sort) = &query.sort {
            params.push(("sort", sort.clone()));
        }
        params.push(("cacheBuster", Utc::now().timestamp_millis().to_string()));

        debug!(url = %self.resource_url, page = query.page, size = query.size, "list");
        let response = self
            .http
            .get(self.resource_url.clone())
            .query(&params)
            .send()
            .await?;
        let response = check_status(response).await?;

        let (link, total_count) = page_headers(response.headers());
        let data: Vec<T> = decode(response).await?;
        Ok(Page::new(data, link, total_count))
    }

    /// `GET {resource}/{id}`
    pub async fn get(&self, id: i64) -> Result<T, ApiError> {
        let response = self.http.get(self.item_url(id)).send().await?;
        decode(check_status(response).await?).await
    }

    /// `POST {resource}`
    pub async fn create(&self, entity: &T) -> Result<T, ApiError> {
        let response = self
            .http
            .post(self.resource_url.clone())
            .json(entity)
            .send()
            .await?;
        decode(check_status(response).await?).await
    }

    /// `PUT {resource}`, full replace
    pub async fn update(&self, entity: &T) -> Result<T, ApiError> {
        let response = self
            .http
            .put(self.resource_url.clone())
            .json(entity)
            .send()
            .await?;
        decode(check_status(response).await?).await
    }

    /// `DELETE {resource}/{id}`
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self.http.delete(self.item_url(id)).send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// Run `call` and convert its outcome into the result action the entity
    /// container expects.
    pub async fn perform(&self, call: RemoteCall<T>) -> EntityAction<T> {
        let name = call.name();
        info!(resource = T::RESOURCE, call = name, "remote call");

        let action = match call {
            RemoteCall::List(query) => match self.list(&query).await {
                Ok(page) => EntityAction::ListDidLoad(page),
                Err(e) => EntityAction::ListDidError(e.into()),
            },
            RemoteCall::Get(id) => match self.get(id).await {
                Ok(entity) => EntityAction::GetDidLoad(entity),
                Err(e) => EntityAction::GetDidError(e.into()),
            },
            RemoteCall::Create(entity) => match self.create(&entity).await {
                Ok(entity) => EntityAction::CreateDidSucceed(entity),
                Err(e) => EntityAction::CreateDidError(e.into()),
            },
            RemoteCall::Update(entity) => match self.update(&entity).await {
                Ok(entity) => EntityAction::UpdateDidSucceed(entity),
                Err(e) => EntityAction::UpdateDidError(e.into()),
            },
            RemoteCall::Delete(id) => match self.delete(id).await {
                Ok(()) => EntityAction::DeleteDidSucceed(id),
                Err(e) => EntityAction::DeleteDidError(e.into()),
            },
        };

        if let Some(error) = action.error() {
            warn!(resource = T::RESOURCE, call = name, error = %error, "remote call failed");
        }
        action
    }
}

/// Clients for every resource the admin touches, sharing one connection pool.
#[derive(Clone)]
pub struct BlogApi {
    pub entries: ResourceClient<BlogEntry>,
    pub blogs: ResourceClient<Blog>,
    pub tags: ResourceClient<Tag>,
}

impl BlogApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("blog-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            entries: ResourceClient::new(http.clone(), &base)?,
            blogs: ResourceClient::new(http.clone(), &base)?,
            tags: ResourceClient::new(http, &base)?,
        })
    }
}

fn page_headers(headers: &HeaderMap) -> (String, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    (header("link"), header("x-total-count"))
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "request failed".to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
        body,
    })
}

/// Problem-details bodies carry a human readable `detail` or `title`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "title", "message"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Deserialization {
        message: e.to_string(),
        body,
    })
}
