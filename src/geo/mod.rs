//! Resolution of GeoStreams resources and bulk upload of observations.

pub mod resolver;
pub mod upload;

pub use resolver::{CreationArgs, ResolveError, Resolver};
pub use upload::{BatchUploader, UploadError};
