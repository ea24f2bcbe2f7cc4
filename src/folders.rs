// Filesystem side of the sync: deciding which directories are patient
// folders, which files inside them count as images, and moving processed
// folders into the imported archive.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Name of the archive directory for processed folders, created directly
/// under the data directory.
pub const IMPORTED_DIR_NAME: &str = "01_IMPORTED";

/// File extensions that count as images, matched case-insensitively.
const IMAGE_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

// Patient folders are UUIDs prefixed with `f` or `s`, lowercase hex only.
static PATIENT_FOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[fs][0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("patient folder pattern is a valid regex")
});

/// Whether a directory name identifies a patient folder.
pub fn is_patient_folder(name: &str) -> bool {
    PATIENT_FOLDER_PATTERN.is_match(name)
}

/// List the patient folders directly under `data_dir` (single level, no
/// recursion). Sorted by name so runs process folders in a stable order.
pub fn patient_folders(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(data_dir)
        .with_context(|| format!("Failed to read data directory {}", data_dir.display()))?;

    let mut folders = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if is_patient_folder(name) {
                folders.push(path);
            }
        }
    }
    folders.sort();
    Ok(folders)
}

/// Collect the image files directly inside `folder` (non-recursive),
/// sorted by name.
pub fn collect_images(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read folder {}", folder.display()))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Ensure the imported archive directory exists under `data_dir` and
/// return its path. Safe to call on every run.
pub fn ensure_imported_dir(data_dir: &Path) -> Result<PathBuf> {
    let dest = data_dir.join(IMPORTED_DIR_NAME);
    fs::create_dir_all(&dest)
        .with_context(|| format!("Failed to create imported directory {}", dest.display()))?;
    Ok(dest)
}

/// Move a processed folder into the archive directory, keeping its name.
pub fn move_to_imported(folder: &Path, imported_dir: &Path) -> Result<PathBuf> {
    let name = folder
        .file_name()
        .with_context(|| format!("Folder has no name: {}", folder.display()))?;
    let target = imported_dir.join(name);
    fs::rename(folder, &target).with_context(|| {
        format!(
            "Failed to move {} to {}",
            folder.display(),
            target.display()
        )
    })?;
    Ok(target)
}
