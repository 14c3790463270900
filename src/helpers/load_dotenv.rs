use std::path::PathBuf;

/// Loads a local `.env` into the process environment, returning its path if one was found
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}
