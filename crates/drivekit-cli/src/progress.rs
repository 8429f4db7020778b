use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use drivekit_client::types::Progress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Shared MultiProgress instance so log output can suspend the bars.
static MULTI: LazyLock<Arc<MultiProgress>> = LazyLock::new(|| Arc::new(MultiProgress::new()));

/// Pause progress display, run the closure, then resume.
pub fn suspend<F: FnOnce()>(f: F) {
    MULTI.suspend(f);
}

fn download_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix}  {wide_bar:.cyan/dim}  {bytes}/{total_bytes}  {bytes_per_sec}  {eta}",
    )
    .unwrap()
    .progress_chars("━━─")
}

/// Create a download progress bar, hidden when `visible` is false.
pub fn create_download_job(prefix: &str, visible: bool) -> ProgressBar {
    let pb = if visible {
        MULTI.add(ProgressBar::new(0))
    } else {
        MULTI.add(ProgressBar::hidden())
    };
    pb.set_style(download_style());
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Handle download progress events and update a progress bar.
pub fn handle_download_progress(state: Progress, pb: &ProgressBar) {
    match state {
        Progress::Starting {
            total,
        } => {
            pb.set_length(total);
        }
        Progress::Chunk {
            current, ..
        } => {
            pb.set_position(current);
        }
        Progress::Complete {
            ..
        } => {
            pb.finish_and_clear();
        }
    }
}
