// Progress reporting for uploads. The sync loop reports per-file outcomes
// through a trait so the console bar stays out of the core logic and tests
// can record events instead of drawing anything.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Callback surface for upload progress. For each folder with images the
/// orchestrator calls `start_folder` once, then `uploaded` or `rejected`
/// once per image, then `finish_folder`.
pub trait ProgressReporter {
    fn start_folder(&mut self, folder: &str, total_images: u64);
    fn uploaded(&mut self, image: &Path);
    fn rejected(&mut self, image: &Path, status: u16, body: &str);
    fn finish_folder(&mut self, folder: &str);
}

/// Console implementation backed by an indicatif progress bar, one bar per
/// folder.
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        ConsoleProgress { bar: None }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn start_folder(&mut self, folder: &str, total_images: u64) {
        let bar = ProgressBar::new(total_images);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
                .unwrap()
                .progress_chars("█▏ "),
        );
        bar.set_message(format!("Uploading {}", folder));
        self.bar = Some(bar);
    }

    fn uploaded(&mut self, image: &Path) {
        if let Some(bar) = &self.bar {
            // println keeps the message above the bar instead of mangling it
            bar.println(format!("  uploaded {}", file_name(image)));
            bar.inc(1);
        }
    }

    fn rejected(&mut self, image: &Path, status: u16, body: &str) {
        if let Some(bar) = &self.bar {
            bar.println(format!(
                "  upload failed for {}: {} {}",
                file_name(image),
                status,
                body
            ));
            bar.inc(1);
        }
    }

    fn finish_folder(&mut self, _folder: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

fn file_name(image: &Path) -> String {
    image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.display().to_string())
}
