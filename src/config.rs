use std::env;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::argsets::ProcessArgs;
use crate::constants::{defaults, envvars};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid GeoStreams base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("GeoStreams base URL '{0}' cannot carry a path")]
    CannotBeABase(String),
    #[error("site name must not be empty")]
    EmptySite,
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
}

/// Everything a run needs to know about its environment, resolved once at start-up
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub base_url: Url,
    pub key: Option<String>,
    pub site: String,
    pub batch_size: usize,
    pub working_space: Option<PathBuf>,
}

fn arg_or_env(arg: &Option<String>, var: &str, default: &str) -> String {
    arg.clone()
        .or_else(|| env::var(var).ok())
        .unwrap_or_else(|| default.to_string())
}

impl Settings {
    pub fn new(args: &ProcessArgs) -> Result<Self, SettingsError> {
        let raw_url = arg_or_env(&args.clowder_url, envvars::CLOWDER_URL, defaults::CLOWDER_URL);
        let base_url = Url::parse(&raw_url).map_err(|source| SettingsError::BaseUrl {
            url: raw_url.clone(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SettingsError::CannotBeABase(raw_url));
        }

        let key = arg_or_env(&args.clowder_key, envvars::CLOWDER_KEY, defaults::CLOWDER_KEY);
        let site = arg_or_env(&args.site_override, envvars::TERRAREF_SITE, defaults::TERRAREF_SITE);
        if site.trim().is_empty() {
            return Err(SettingsError::EmptySite);
        }

        let batch_size = args.batch_size.unwrap_or(defaults::BATCH_SIZE);
        if batch_size == 0 {
            return Err(SettingsError::ZeroBatchSize);
        }

        Ok(Settings {
            base_url,
            key: Some(key).filter(|k| !k.is_empty()),
            site,
            batch_size,
            working_space: args.working_space.clone(),
        })
    }
}
