use std::path::{Path, PathBuf};

use crate::error::RunError;

pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collects image files under `dir`, sorted for stable logs.
pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>, RunError> {
    if !dir.exists() {
        return Err(RunError::Configuration(format!(
            "image directory does not exist: {}",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(RunError::Configuration(format!(
            "image path is not a directory: {}",
            dir.display()
        )));
    }

    let root = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/**/*", root.trim_end_matches('/'));
    let entries = glob::glob(&pattern)
        .map_err(|e| RunError::Configuration(format!("bad image directory pattern: {e}")))?;

    let mut images = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() && is_image(&path) => images.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
        }
    }
    images.sort();
    Ok(images)
}

/// Fails with an input validation error when `dir` holds no images.
pub fn require_images(dir: &Path) -> Result<Vec<PathBuf>, RunError> {
    let images = find_images(dir)?;
    if images.is_empty() {
        return Err(RunError::InputValidation(format!(
            "no image files (.jpg/.jpeg/.png) found in {}",
            dir.display()
        )));
    }
    tracing::info!(count = images.len(), dir = %dir.display(), "found image files");
    Ok(images)
}
