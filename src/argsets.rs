use std::path::PathBuf;

/// Command-line arguments of a processing run; unset options fall back to the environment
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessArgs {
    pub batch_size: Option<usize>,
    pub clowder_url: Option<String>,
    pub clowder_key: Option<String>,
    pub site_override: Option<String>,
    pub working_space: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}
