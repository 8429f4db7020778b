use std::io::Read;

use drivekit_config::config::Config;
use serde::Deserialize;
use tracing::debug;
use ureq::{
    http::{header::AUTHORIZATION, Response},
    Body,
};
use url::Url;

use crate::{error::DriveError, http_client::SHARED_AGENT};

/// Query parameters of a single request.
pub type Params<'a> = [(&'a str, String)];

/// The network boundary of [`crate::DriveService`].
///
/// Paths are relative to the API base (`/files`, `/files/{id}`, `/about`).
/// Implementations fail fast; retries are left to the caller.
pub trait Transport {
    /// Issues a GET request and decodes the JSON body.
    fn get_json(&self, path: &str, params: &Params) -> Result<serde_json::Value, DriveError>;

    /// Issues a GET request and returns the raw body.
    fn download(&self, path: &str, params: &Params) -> Result<Box<dyn Read>, DriveError>;
}

/// The service's error envelope: `{"error": {"code": 404, "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: u16,
    message: String,
}

/// Decodes a non-success response body into the most specific error available.
pub fn api_error(status: u16, url: &str, body: &str) -> DriveError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => {
            DriveError::Api {
                code: envelope.error.code,
                message: envelope.error.message,
            }
        }
        Err(_) => {
            DriveError::HttpError {
                status,
                url: url.to_string(),
            }
        }
    }
}

/// [`Transport`] over the shared HTTP agent, authenticated with a bearer token.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, DriveError> {
        let base_url = Url::parse(base_url).map_err(|source| {
            DriveError::InvalidUrl {
                url: base_url.to_string(),
                source,
            }
        })?;

        Ok(Self {
            base_url,
            token: token.into(),
        })
    }

    /// Builds a transport from the configured API URL and access token.
    pub fn from_config(config: &Config) -> Result<Self, DriveError> {
        let token = config.access_token().ok_or(DriveError::MissingToken)?;
        Self::new(config.api_url(), token)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Joins `path` onto the base URL and appends the query parameters.
    pub fn url(&self, path: &str, params: &Params) -> String {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        url.to_string()
    }

    fn call(&self, path: &str, params: &Params) -> Result<Response<Body>, DriveError> {
        let url = self.url(path, params);
        debug!("GET {}", url);

        let mut resp = SHARED_AGENT
            .get(&url)
            .header(AUTHORIZATION, &format!("Bearer {}", self.token))
            .call()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.body_mut().read_to_string().unwrap_or_default();
            return Err(api_error(status.as_u16(), &url, &body));
        }

        Ok(resp)
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, path: &str, params: &Params) -> Result<serde_json::Value, DriveError> {
        self.call(path, params)?
            .body_mut()
            .read_json()
            .map_err(|_| DriveError::InvalidResponse)
    }

    fn download(&self, path: &str, params: &Params) -> Result<Box<dyn Read>, DriveError> {
        let resp = self.call(path, params)?;
        Ok(Box::new(resp.into_body().into_reader()))
    }
}
