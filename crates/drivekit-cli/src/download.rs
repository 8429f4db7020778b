use std::path::PathBuf;

use drivekit_client::{
    error::Result, types::OverwriteMode, Download, DriveService, Transport,
};
use nu_ansi_term::Color::{Green, Yellow};
use tracing::info;

use crate::{
    progress::{create_download_job, handle_download_progress},
    utils::{format_size, Colored},
};

pub struct DownloadContext {
    pub output: Option<PathBuf>,
    pub default_dir: PathBuf,
    pub force: bool,
    pub show_progress: bool,
}

pub fn download<T: Transport>(
    service: &DriveService<T>,
    id: &str,
    ctx: DownloadContext,
) -> Result<()> {
    let overwrite = if ctx.force {
        OverwriteMode::Force
    } else {
        OverwriteMode::Skip
    };

    let pb = create_download_job(id, ctx.show_progress);

    let mut dl = Download::new(service, id)
        .default_dir(ctx.default_dir)
        .overwrite(overwrite)
        .progress(|state| handle_download_progress(state, &pb));
    if let Some(output) = ctx.output {
        dl = dl.output(output);
    }

    let done = dl.execute();
    pb.finish_and_clear();
    let done = done?;

    if done.skipped {
        info!(
            path = %done.path.display(),
            skipped = true,
            "{} already exists, use --force to overwrite",
            Colored(Yellow, done.path.display())
        );
    } else {
        info!(
            path = %done.path.display(),
            bytes = done.bytes,
            "Downloaded {} ({})",
            Colored(Green, done.path.display()),
            format_size(Some(done.bytes))
        );
    }
    Ok(())
}
