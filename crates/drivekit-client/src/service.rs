use std::{collections::HashSet, io::Read, path::Path};

use drivekit_config::config::DEFAULT_FILE_FIELDS;
use drivekit_query::Query;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::{
    download::Download,
    error::{DriveError, Result},
    fields::{ABOUT_DEFAULT, FOLDER_MIME, ROOT_ID},
    transport::{Params, Transport},
    types::{About, DriveFile, FileList, OverwriteMode},
    utils::encode_segment,
};

/// Operations on a remote drive, issued through a [`Transport`].
pub struct DriveService<T: Transport> {
    transport: T,
    root: DriveFile,
    page_size: u32,
}

/// Checks a query before it is sent.
///
/// Returns `None` for an empty query, which listing treats as "no filter".
fn validated_filter(query: &Query) -> Result<Option<String>> {
    if let Some(err) = query.err() {
        return Err(DriveError::InvalidQuery(err.clone()));
    }

    let filter = query.build()?;
    if query.is_empty() {
        Ok(None)
    } else {
        Ok(Some(filter))
    }
}

fn list_fields(file_fields: &str) -> String {
    format!("nextPageToken, files({file_fields})")
}

impl<T: Transport> DriveService<T> {
    /// Connects to the drive by fetching its root folder.
    pub fn connect(transport: T) -> Result<Self> {
        let mut service = Self {
            transport,
            root: DriveFile::default(),
            page_size: 0,
        };
        service.root = service.get(ROOT_ID)?;
        debug!("connected, root folder id {}", service.root.id);
        Ok(service)
    }

    /// Sets the page size used when walking every page of a search.
    ///
    /// `0` leaves the page size to the service.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn root(&self) -> &DriveFile {
        &self.root
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn fetch<D: DeserializeOwned>(&self, path: &str, params: &Params) -> Result<D> {
        let value = self.transport.get_json(path, params)?;
        serde_json::from_value(value).map_err(|_| DriveError::InvalidResponse)
    }

    /// Fetches account information. All fields are requested when `fields` is empty.
    pub fn about(&self, fields: &[&str]) -> Result<About> {
        let fields = if fields.is_empty() {
            "*".to_string()
        } else {
            fields.join(",")
        };
        self.fetch("/about", &[("fields", fields)])
    }

    /// Fetches account information with the common fields.
    pub fn about_default(&self) -> Result<About> {
        self.about(&ABOUT_DEFAULT)
    }

    pub fn get(&self, id: &str) -> Result<DriveFile> {
        self.get_with_fields(id, DEFAULT_FILE_FIELDS)
    }

    pub fn get_with_fields(&self, id: &str, file_fields: &str) -> Result<DriveFile> {
        let path = format!("/files/{}", encode_segment(id));
        if file_fields.is_empty() {
            self.fetch(&path, &[])
        } else {
            self.fetch(&path, &[("fields", file_fields.to_string())])
        }
    }

    /// Walks from `child` up through its first parent until a file without parents.
    ///
    /// The returned chain starts with `child` and ends with the topmost ancestor.
    pub fn file_to_root(&self, child: DriveFile) -> Result<Vec<DriveFile>> {
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut current = child;

        loop {
            seen.insert(current.id.clone());
            let parent = current.parents.first().cloned();
            chain.push(current);

            match parent {
                Some(id) if !seen.contains(&id) => current = self.get(&id)?,
                Some(id) => {
                    debug!("parent {} already visited, stopping", id);
                    break;
                }
                None => break,
            }
        }

        Ok(chain)
    }

    /// Looks up a single file by exact name.
    ///
    /// `folder` restricts the match to folders; trashed files are excluded
    /// unless `trashed` is set.
    pub fn get_by_name(
        &self,
        name: &str,
        folder: bool,
        trashed: bool,
        file_fields: &str,
    ) -> Result<DriveFile> {
        let mut query = Query::new().name().eq(name);
        if folder {
            query = query.and().mime_type().eq(FOLDER_MIME);
        }
        if !trashed {
            query = query.and().trashed_eq(false);
        }
        self.get_by_query(&query, file_fields)
    }

    /// Returns the first file matching `query`.
    ///
    /// The query must be error-free and contain at least one clause.
    pub fn get_by_query(&self, query: &Query, file_fields: &str) -> Result<DriveFile> {
        let filter = validated_filter(query)?.ok_or(DriveError::EmptyQuery)?;

        let mut params = vec![("q", filter), ("pageSize", "1".to_string())];
        if !file_fields.is_empty() {
            params.push(("fields", format!("files({file_fields})")));
        }

        let page: FileList = self.fetch("/files", &params)?;
        page.files.into_iter().next().ok_or(DriveError::NotFound)
    }

    /// Fetches a single page of files, restricted to `parent_id` when given.
    pub fn list(&self, page_size: u32, parent_id: &str, file_fields: &str) -> Result<FileList> {
        let mut params = vec![("fields", list_fields(file_fields))];
        if page_size > 0 {
            params.push(("pageSize", page_size.to_string()));
        }
        if !parent_id.is_empty() {
            params.push(("q", Query::new().parents().is_in(parent_id).build()?));
        }
        self.fetch("/files", &params)
    }

    /// Fetches every file directly inside `parent_id`.
    pub fn list_all(&self, parent_id: &str, file_fields: &str) -> Result<Vec<DriveFile>> {
        if parent_id.is_empty() {
            return Err(DriveError::MissingParent);
        }
        self.search_all(&Query::new().parents().is_in(parent_id), file_fields)
    }

    /// Searches inside one folder by appending `and parents in '<parent_id>'` to `query`.
    pub fn search_folder(
        &self,
        parent_id: &str,
        query: Query,
        file_fields: &str,
    ) -> Result<Vec<DriveFile>> {
        if parent_id.is_empty() {
            return Err(DriveError::MissingParent);
        }
        if query.is_empty() {
            return Err(DriveError::EmptyQuery);
        }
        let query = query.and().parents().is_in(parent_id);
        self.search_all(&query, file_fields)
    }

    /// Fetches every page of files matching `query`.
    ///
    /// An empty query lists everything visible to the account.
    pub fn search_all(&self, query: &Query, file_fields: &str) -> Result<Vec<DriveFile>> {
        let mut params = vec![("fields", list_fields(file_fields))];
        if let Some(filter) = validated_filter(query)? {
            params.push(("q", filter));
        }
        if self.page_size > 0 {
            params.push(("pageSize", self.page_size.to_string()));
        }

        let mut files = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut page_params = params.clone();
            if let Some(token) = &next_token {
                page_params.push(("pageToken", token.clone()));
            }

            let page: FileList = self.fetch("/files", &page_params)?;
            trace!("fetched page with {} files", page.files.len());
            files.extend(page.files);

            next_token = page.next_page_token.filter(|t| !t.is_empty());
            if next_token.is_none() {
                break;
            }
        }

        debug!("search returned {} files", files.len());
        Ok(files)
    }

    /// Opens the content of a file for reading.
    pub fn open(&self, id: &str) -> Result<Box<dyn Read>> {
        let path = format!("/files/{}", encode_segment(id));
        self.transport.download(&path, &[("alt", "media".to_string())])
    }

    /// Downloads a file to `path`, replacing any existing file, and returns the bytes written.
    pub fn download(&self, id: &str, path: impl AsRef<Path>) -> Result<u64> {
        let downloaded = Download::new(self, id)
            .output(path.as_ref())
            .overwrite(OverwriteMode::Force)
            .execute()?;
        Ok(downloaded.bytes)
    }
}
