use std::{
    env,
    fmt::Display,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use drivekit_client::types::DriveFile;
use drivekit_config::paths::expand_home;
use indicatif::HumanBytes;
use nu_ansi_term::Color::{self, Blue, Cyan};

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color = COLOR.read().unwrap();
        if *color {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Human readable size, or `-` when unknown.
pub fn format_size(bytes: Option<u64>) -> String {
    bytes
        .map(|b| HumanBytes(b).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Size encoded by the service as a decimal string.
pub fn parse_size(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.parse().ok())
}

/// A one-line summary of a file: id, name (folders end in `/`) and size.
pub fn file_line(file: &DriveFile) -> String {
    let name = if file.is_folder() {
        Colored(Cyan, format!("{}/", file.name)).to_string()
    } else {
        file.name.clone()
    };
    format!(
        "{}  {}  {}",
        Colored(Blue, &file.id),
        name,
        format_size(file.size_bytes())
    )
}

/// Expands `~` and makes a relative path absolute against the current directory.
pub fn resolve_path(path: &str) -> std::io::Result<PathBuf> {
    let path = expand_home(path);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
