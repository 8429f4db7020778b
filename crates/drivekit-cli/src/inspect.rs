use drivekit_client::{
    error::Result,
    types::{About, DriveFile},
    DriveService, Transport,
};
use nu_ansi_term::Color::{Cyan, Green};
use tracing::info;

use crate::utils::{format_size, parse_size, Colored};

pub fn show_about<T: Transport>(service: &DriveService<T>, fields: &[String]) -> Result<()> {
    let about = if fields.is_empty() {
        service.about_default()?
    } else {
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        service.about(&fields)?
    };

    print_about(&about);
    Ok(())
}

fn print_about(about: &About) {
    if let Some(user) = &about.user {
        info!(
            display_name = ?user.display_name,
            email = ?user.email_address,
            "{}: {} <{}>",
            Colored(Cyan, "User"),
            user.display_name.as_deref().unwrap_or("-"),
            user.email_address.as_deref().unwrap_or("-")
        );
    }

    if let Some(quota) = &about.storage_quota {
        let usage = parse_size(quota.usage.as_deref());
        let limit = parse_size(quota.limit.as_deref());
        info!(
            usage = usage,
            limit = limit,
            "{}: {} of {} ({} in trash)",
            Colored(Cyan, "Storage"),
            format_size(usage),
            limit
                .map(|l| format_size(Some(l)))
                .unwrap_or_else(|| "unlimited".to_string()),
            format_size(parse_size(quota.usage_in_drive_trash.as_deref()))
        );
    }

    if let Some(max) = parse_size(about.max_upload_size.as_deref()) {
        info!(
            max_upload_size = max,
            "{}: {}",
            Colored(Cyan, "Max upload size"),
            format_size(Some(max))
        );
    }
}

fn print_file_details(file: &DriveFile) {
    let rows = [
        ("Id", file.id.clone()),
        ("Name", file.name.clone()),
        ("MIME type", file.mime_type.clone()),
        ("Parents", file.parents.join(", ")),
        ("Size", format_size(file.size_bytes())),
        (
            "Modified",
            file.modified_at()
                .map(|t| t.to_rfc2822())
                .unwrap_or_else(|| "-".to_string()),
        ),
        (
            "Trashed",
            file.trashed.map(|t| t.to_string()).unwrap_or_default(),
        ),
    ];

    for (label, value) in rows {
        if !value.is_empty() {
            info!(field = label, value = %value, "{}: {}", Colored(Cyan, label), value);
        }
    }
}

pub fn show_file<T: Transport>(service: &DriveService<T>, id: &str, file_fields: &str) -> Result<()> {
    let file = service.get_with_fields(id, file_fields)?;
    print_file_details(&file);
    Ok(())
}

/// Joins the names of a leaf-first ancestor chain into a `/`-separated path.
pub fn chain_to_path(chain: &[DriveFile]) -> String {
    chain
        .iter()
        .rev()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn show_path<T: Transport>(service: &DriveService<T>, id: &str) -> Result<()> {
    let file = service.get(id)?;
    let chain = service.file_to_root(file)?;
    let path = chain_to_path(&chain);
    info!(path = %path, depth = chain.len(), "{}", Colored(Green, &path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> DriveFile {
        DriveFile {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_chain_to_path() {
        let chain = vec![named("notes.txt"), named("docs"), named("My Drive")];
        assert_eq!(chain_to_path(&chain), "My Drive/docs/notes.txt");
    }

    #[test]
    fn test_chain_to_path_single() {
        assert_eq!(chain_to_path(&[named("My Drive")]), "My Drive");
        assert_eq!(chain_to_path(&[]), "");
    }
}
