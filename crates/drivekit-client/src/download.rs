use std::{
    fs::{self, File},
    io::{Read, Write as _},
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::{DriveError, Result},
    fields::DOWNLOAD_FIELDS,
    service::DriveService,
    transport::Transport,
    types::{Downloaded, OverwriteMode, Progress},
    utils::{resolve_output_path, sanitize_filename},
};

/// Builder for downloading one file's content to disk.
pub struct Download<'a, T: Transport> {
    service: &'a DriveService<T>,
    id: String,
    output: Option<PathBuf>,
    default_dir: PathBuf,
    overwrite: OverwriteMode,
    on_progress: Option<Box<dyn Fn(Progress) + 'a>>,
}

impl<'a, T: Transport> Download<'a, T> {
    /// Creates a download of file `id` into the current directory,
    /// skipping the transfer if the target already exists.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use drivekit_client::{Download, DriveService, HttpTransport};
    ///
    /// let transport = HttpTransport::new("https://www.googleapis.com/drive/v3", "token")?;
    /// let service = DriveService::connect(transport)?;
    /// let done = Download::new(&service, "1AbC").output("report.pdf").execute()?;
    /// println!("{} bytes", done.bytes);
    /// # Ok::<(), drivekit_client::DriveError>(())
    /// ```
    pub fn new(service: &'a DriveService<T>, id: impl Into<String>) -> Self {
        Self {
            service,
            id: id.into(),
            output: None,
            default_dir: PathBuf::from("."),
            overwrite: OverwriteMode::Skip,
            on_progress: None,
        }
    }

    /// Sets the destination. A directory (or a path ending in `/`) receives the remote name.
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Directory used when no output is set.
    pub fn default_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_dir = dir.into();
        self
    }

    pub fn overwrite(mut self, overwrite: OverwriteMode) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn progress<F>(mut self, on_progress: F) -> Self
    where
        F: Fn(Progress) + 'a,
    {
        self.on_progress = Some(Box::new(on_progress));
        self
    }

    fn emit(&self, event: Progress) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    /// Resolves the target path and streams the file content into it.
    pub fn execute(self) -> Result<Downloaded> {
        let meta = self.service.get_with_fields(&self.id, DOWNLOAD_FIELDS)?;
        let remote_name = sanitize_filename(&meta.name).or_else(|| sanitize_filename(&self.id));

        let output_path =
            resolve_output_path(self.output.as_deref(), &self.default_dir, remote_name)
                .ok_or(DriveError::InvalidResponse)?;

        if output_path.is_file() && self.overwrite == OverwriteMode::Skip {
            info!("{} already exists, skipping", output_path.display());
            return Ok(Downloaded {
                path: output_path,
                bytes: 0,
                skipped: true,
            });
        }

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let total = meta.size_bytes().unwrap_or(0);
        let bytes = self.download_to_file(&output_path, total)?;
        debug!("downloaded {} bytes to {}", bytes, output_path.display());

        Ok(Downloaded {
            path: output_path,
            bytes,
            skipped: false,
        })
    }

    /// Streams into `<path>.part` and renames it over `path` once complete.
    /// The part file is removed if the transfer fails.
    fn download_to_file(&self, path: &Path, total: u64) -> Result<u64> {
        let mut reader = self.service.open(&self.id)?;

        self.emit(Progress::Starting {
            total,
        });

        let part_path = PathBuf::from(format!("{}.part", path.display()));
        let downloaded = match self.copy_to_part(&mut reader, &part_path, total) {
            Ok(downloaded) => downloaded,
            Err(err) => {
                debug!("removing {} after failed transfer", part_path.display());
                let _ = fs::remove_file(&part_path);
                return Err(err);
            }
        };
        fs::rename(&part_path, path)?;

        self.emit(Progress::Complete {
            total: downloaded,
        });

        Ok(downloaded)
    }

    fn copy_to_part(&self, reader: &mut dyn Read, part_path: &Path, total: u64) -> Result<u64> {
        let mut file = File::create(part_path)?;
        let mut buffer = [0u8; 8192];
        let mut downloaded = 0u64;

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }

            file.write_all(&buffer[..n])?;
            downloaded += n as u64;

            self.emit(Progress::Chunk {
                current: downloaded,
                total,
            });
        }
        file.flush()?;

        Ok(downloaded)
    }
}
