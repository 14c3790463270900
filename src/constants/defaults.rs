pub const LOG_LEVEL: &str = "info";

pub const CLOWDER_URL: &str = "https://terraref.ncsa.illinois.edu/clowder/";
pub const CLOWDER_KEY: &str = "";
pub const TERRAREF_SITE: &str = "ua-mac";

/// Maximum number of data points submitted in one bulk request
/// (the uploader sends at most one more than this, see `geo::upload`).
pub const BATCH_SIZE: usize = 3000;

pub const GEOSTREAMS_API_PATH: &str = "api/geostreams";
pub const RESULT_FILENAME: &str = "result.json";
