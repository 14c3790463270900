use std::path::{Path, PathBuf};

use crate::constants::transformer::{FILENAME_END, FILENAME_START};

fn is_flow_meter_file(path: &Path) -> bool {
    let starts = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(FILENAME_START));
    starts && path.to_str().is_some_and(|p| p.ends_with(FILENAME_END))
}

/// First candidate that looks like a flow meter totals file
pub fn select_file_to_load(files: &[PathBuf]) -> Option<&PathBuf> {
    files.iter().find(|f| is_flow_meter_file(f))
}

pub fn no_file_message() -> String {
    format!(
        "No irrigation CSV file was found in list of files to process (file name must match '{FILENAME_START}*{FILENAME_END}')"
    )
}
