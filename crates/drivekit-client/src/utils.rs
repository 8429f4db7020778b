use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a file id for use as a URL path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Reduces a remote file name to a single safe path component.
pub fn sanitize_filename(name: &str) -> Option<String> {
    name.split(['/', '\\'])
        .next_back()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(String::from)
}

/// Determine output path
///
/// An explicit output ending in `/` or naming an existing directory receives
/// the remote file name; any other explicit output is used verbatim. Without
/// an output, the remote name is placed in `default_dir`.
pub fn resolve_output_path(
    output: Option<&Path>,
    default_dir: &Path,
    remote_name: Option<String>,
) -> Option<PathBuf> {
    match output {
        Some(p) if p.as_os_str().to_string_lossy().ends_with('/') || p.is_dir() => {
            remote_name.map(|name| p.join(name))
        }
        Some(p) => Some(p.to_path_buf()),
        None => remote_name.map(|name| default_dir.join(name)),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("1AbC-d_e.f~"), "1AbC-d_e.f~");
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf").as_deref(), Some("report.pdf"));
        assert_eq!(sanitize_filename("../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_filename(r"dir\file.txt").as_deref(), Some("file.txt"));
        assert!(sanitize_filename("..").is_none());
        assert!(sanitize_filename("dir/").is_none());
        assert!(sanitize_filename("").is_none());
    }

    #[test]
    fn test_resolve_output_explicit_file() {
        let path = resolve_output_path(
            Some(Path::new("out/file.bin")),
            Path::new("."),
            Some("remote.bin".into()),
        );
        assert_eq!(path, Some(PathBuf::from("out/file.bin")));
    }

    #[test]
    fn test_resolve_output_trailing_slash() {
        let path = resolve_output_path(
            Some(Path::new("downloads/")),
            Path::new("."),
            Some("remote.bin".into()),
        );
        assert_eq!(path, Some(PathBuf::from("downloads/remote.bin")));
    }

    #[test]
    fn test_resolve_output_existing_dir() {
        let dir = TempDir::new().unwrap();
        let path = resolve_output_path(Some(dir.path()), Path::new("."), Some("a.txt".into()));
        assert_eq!(path, Some(dir.path().join("a.txt")));
    }

    #[test]
    fn test_resolve_output_default_dir() {
        let path = resolve_output_path(None, Path::new("/data"), Some("a.txt".into()));
        assert_eq!(path, Some(PathBuf::from("/data/a.txt")));
        assert!(resolve_output_path(None, Path::new("/data"), None).is_none());
    }
}
