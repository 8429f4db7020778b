pub mod download;
pub mod error;
pub mod fields;
pub mod http_client;
pub mod service;
pub mod transport;
pub mod types;
pub mod utils;

#[cfg(test)]
mod mock;

pub use download::Download;
pub use drivekit_query::Query;
pub use error::DriveError;
pub use service::DriveService;
pub use transport::{HttpTransport, Transport};
