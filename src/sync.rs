// Folder sync orchestrator. One pass over the data directory: every
// patient folder gets a remote project with its images uploaded and an ML
// backend attached, then moves into the imported archive. Folders without
// images move straight to the archive with no API calls.
//
// Fault isolation is per folder: an error anywhere in a folder's
// processing is logged and leaves that folder in place, and the loop moves
// on to the next one. Re-running the sync is the retry mechanism.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::api::{ImportOutcome, LabelService};
use crate::config::SyncConfig;
use crate::folders;
use crate::progress::ProgressReporter;

/// Process every patient folder directly under `config.data_dir`.
///
/// Returns an error only if the imported archive directory cannot be
/// created or the data directory cannot be listed; per-folder failures are
/// logged and swallowed.
pub fn sync_folders(
    config: &SyncConfig,
    service: &dyn LabelService,
    progress: &mut dyn ProgressReporter,
) -> Result<()> {
    let imported_dir = folders::ensure_imported_dir(&config.data_dir)?;

    for folder in folders::patient_folders(&config.data_dir)? {
        // patient_folders only yields pattern-matching names, which are
        // always valid UTF-8
        let name = match folder.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        info!(folder = %name, "processing folder");
        if let Err(err) = process_folder(config, service, progress, &folder, &name, &imported_dir)
        {
            error!(folder = %name, error = %format!("{err:#}"), "folder processing failed, leaving it in place");
        }
    }
    Ok(())
}

/// Handle one patient folder end to end. Any error returned here leaves
/// the folder unmoved for a retry on the next run.
fn process_folder(
    config: &SyncConfig,
    service: &dyn LabelService,
    progress: &mut dyn ProgressReporter,
    folder: &Path,
    name: &str,
    imported_dir: &Path,
) -> Result<()> {
    let images = folders::collect_images(folder)?;

    if images.is_empty() {
        folders::move_to_imported(folder, imported_dir)?;
        info!(folder = %name, "no images found, moved folder as already processed");
        return Ok(());
    }

    let label_config = fs::read_to_string(&config.label_config_path).with_context(|| {
        format!(
            "Failed to read label config {}",
            config.label_config_path.display()
        )
    })?;

    let project_id = service.create_project(name, &label_config)?;
    let backend_id = service.register_backend(project_id)?;
    info!(
        folder = %name,
        project_id,
        backend_id,
        images = images.len(),
        "created project and registered backend"
    );

    progress.start_folder(name, images.len() as u64);
    for image in &images {
        match service.import_image(project_id, image) {
            Ok(ImportOutcome::Uploaded) => progress.uploaded(image),
            Ok(ImportOutcome::Rejected { status, body }) => {
                warn!(folder = %name, image = %image.display(), status, "upload rejected");
                progress.rejected(image, status, &body);
            }
            Err(err) => {
                // No HTTP response at all, the server is unreachable mid
                // folder. Folder-fatal so the whole folder is retried.
                progress.finish_folder(name);
                return Err(err);
            }
        }
    }
    progress.finish_folder(name);

    // The move is unconditional on upload outcomes: rejected files are in
    // the logs, they do not keep the folder in the queue.
    folders::move_to_imported(folder, imported_dir)?;
    info!(folder = %name, "moved folder to imported");
    Ok(())
}
