pub const LOG_LEVEL: &str = "LOG_LEVEL";

pub const CLOWDER_URL: &str = "CLOWDER_URL";
pub const CLOWDER_KEY: &str = "CLOWDER_KEY";
pub const TERRAREF_SITE: &str = "TERRAREF_SITE";
