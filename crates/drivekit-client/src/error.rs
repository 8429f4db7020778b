use drivekit_config::error::ConfigError;
use drivekit_query::QueryError;
use miette::Diagnostic;
use thiserror::Error;

pub const BAD_REQUEST: u16 = 400;
pub const INVALID_CREDENTIALS: u16 = 401;
pub const LIMIT_EXCEEDED: u16 = 403;
pub const FILE_NOT_FOUND: u16 = 404;
pub const TOO_MANY_REQUESTS: u16 = 429;
pub const BACKEND_ERROR: u16 = 500;
pub const UNKNOWN_ERROR: u16 = 501;

#[derive(Error, Diagnostic, Debug)]
pub enum DriveError {
    #[error("Invalid URL: {url}")]
    #[diagnostic(code(drivekit_client::invalid_url))]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    #[diagnostic(
        code(drivekit_client::network),
        help("Check your internet connection or try again later")
    )]
    Network(#[from] Box<ureq::Error>),

    #[error("HTTP {status}: {url}")]
    #[diagnostic(code(drivekit_client::http_error))]
    HttpError { status: u16, url: String },

    #[error("Drive API error {code}: {message}")]
    #[diagnostic(code(drivekit_client::api_error))]
    Api { code: u16, message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(drivekit_client::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid response from server")]
    #[diagnostic(code(drivekit_client::invalid_response))]
    InvalidResponse,

    #[error("Invalid filter: {0}")]
    #[diagnostic(
        code(drivekit_client::invalid_query),
        help("Fix the query chain; a malformed filter is never sent")
    )]
    InvalidQuery(#[from] QueryError),

    #[error("No query defined")]
    #[diagnostic(
        code(drivekit_client::empty_query),
        help("Add at least one term to the query")
    )]
    EmptyQuery,

    #[error("No parent id provided")]
    #[diagnostic(code(drivekit_client::missing_parent))]
    MissingParent,

    #[error("File not found")]
    #[diagnostic(code(drivekit_client::not_found))]
    NotFound,

    #[error("No access token configured")]
    #[diagnostic(
        code(drivekit_client::missing_token),
        help("Set `access_token` in config.toml or export DRIVEKIT_TOKEN")
    )]
    MissingToken,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, DriveError>;

impl From<ureq::Error> for DriveError {
    fn from(e: ureq::Error) -> Self {
        Self::Network(Box::new(e))
    }
}

impl DriveError {
    /// Maps the error onto the service's error code family.
    ///
    /// Errors that did not come from the service report [`UNKNOWN_ERROR`]
    /// unless they describe a request the service would reject anyway.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Api { code, .. } => *code,
            Self::HttpError { status, .. } => *status,
            Self::InvalidUrl { .. }
            | Self::InvalidQuery(_)
            | Self::EmptyQuery
            | Self::MissingParent => BAD_REQUEST,
            Self::MissingToken => INVALID_CREDENTIALS,
            Self::NotFound => FILE_NOT_FOUND,
            Self::Network(_) | Self::Io(_) | Self::InvalidResponse | Self::Config(_) => {
                UNKNOWN_ERROR
            }
        }
    }
}
