//! Identifiers and field names understood by the service.

/// Alias the service accepts for the root folder's id.
pub const ROOT_ID: &str = "root";

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

pub const ABOUT_APP_INSTALLED: &str = "appInstalled";
pub const ABOUT_EXPORT_FORMATS: &str = "exportFormats";
pub const ABOUT_FOLDER_COLOR_PALETTE: &str = "folderColorPalette";
pub const ABOUT_IMPORT_FORMATS: &str = "importFormats";
pub const ABOUT_KIND: &str = "kind";
pub const ABOUT_MAX_IMPORT_SIZES: &str = "maxImportSizes";
pub const ABOUT_MAX_UPLOAD_SIZE: &str = "maxUploadSize";
pub const ABOUT_STORAGE_QUOTA: &str = "storageQuota";
pub const ABOUT_USER: &str = "user";

/// About fields requested when none are given.
pub const ABOUT_DEFAULT: [&str; 3] = [ABOUT_KIND, ABOUT_USER, ABOUT_STORAGE_QUOTA];

/// Fields needed to name and size a download.
pub const DOWNLOAD_FIELDS: &str = "id, name, size";
