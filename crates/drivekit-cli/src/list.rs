use drivekit_client::{error::Result, types::DriveFile, DriveService, Transport};
use drivekit_query::Query;
use nu_ansi_term::Color::Yellow;
use tracing::info;

use crate::utils::{file_line, Colored};

/// Filters accepted by the `search` command.
#[derive(Debug, Default)]
pub struct SearchFilter {
    pub name: Option<String>,
    pub not_name: Option<String>,
    pub mime_type: Option<String>,
    pub text: Option<String>,
    pub starred: bool,
    pub exclude_trashed: bool,
    pub any: bool,
}

/// Joins the filters with `and` (or `or` with `--any`).
///
/// The trash exclusion is always appended with `and`.
pub fn build_search_query(filter: &SearchFilter) -> Query {
    let join = |query: Query| {
        if query.is_empty() {
            query
        } else if filter.any {
            query.or()
        } else {
            query.and()
        }
    };

    let mut query = Query::new();
    if let Some(name) = &filter.name {
        query = join(query).name().eq(name.as_str());
    }
    if let Some(name) = &filter.not_name {
        query = join(query).not().name().eq(name.as_str());
    }
    if let Some(mime) = &filter.mime_type {
        query = join(query).mime_type().eq(mime.as_str());
    }
    if let Some(text) = &filter.text {
        query = join(query).full_text().contains(text.as_str());
    }
    if filter.starred {
        query = join(query).starred_eq(true);
    }

    if filter.exclude_trashed {
        if !query.is_empty() {
            query = query.and();
        }
        query = query.trashed_eq(false);
    }

    query
}

/// Logs one line per file; in JSON mode the fields are emitted as structured data.
pub fn print_files(files: &[DriveFile]) {
    for file in files {
        info!(
            id = %file.id,
            name = %file.name,
            mime_type = %file.mime_type,
            size = file.size_bytes(),
            modified = ?file.modified_time,
            "{}",
            file_line(file)
        );
    }
}

pub fn list_files<T: Transport>(
    service: &DriveService<T>,
    parent: Option<String>,
    all: bool,
    page_size: u32,
    file_fields: &str,
) -> Result<()> {
    let parent = parent.unwrap_or_else(|| service.root().id.clone());

    if all {
        let files = service.list_all(&parent, file_fields)?;
        print_files(&files);
        info!("{} files", files.len());
        return Ok(());
    }

    let page = service.list(page_size, &parent, file_fields)?;
    print_files(&page.files);

    if page.next_page_token.is_some_and(|t| !t.is_empty()) {
        info!(
            "{}",
            Colored(Yellow, "More files available, use --all to list every page")
        );
    }
    Ok(())
}

pub fn search_files<T: Transport>(
    service: &DriveService<T>,
    filter: &SearchFilter,
    parent: Option<String>,
    file_fields: &str,
) -> Result<()> {
    let query = build_search_query(filter);

    let files = match parent {
        Some(parent) if query.is_empty() => service.list_all(&parent, file_fields)?,
        Some(parent) => service.search_folder(&parent, query, file_fields)?,
        None => service.search_all(&query, file_fields)?,
    };

    print_files(&files);
    info!("{} files", files.len());
    Ok(())
}

pub fn find_file<T: Transport>(
    service: &DriveService<T>,
    name: &str,
    folder: bool,
    trashed: bool,
    file_fields: &str,
) -> Result<()> {
    let file = service.get_by_name(name, folder, trashed, file_fields)?;
    print_files(std::slice::from_ref(&file));
    Ok(())
}
