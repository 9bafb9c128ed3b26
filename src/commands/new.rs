//! Create a new page or post

use anyhow::{bail, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::fs;
use std::path::PathBuf;

use crate::content::{ContentRepository, ResourceId};

/// Create a new entry and return where it was written
///
/// Posts are filed under today's date; pages go straight into `pages/`.
pub fn create_entry(
    repository: &ContentRepository,
    title: &str,
    layout: &str,
    slug: Option<&str>,
) -> Result<PathBuf> {
    create_entry_on(repository, title, layout, slug, Local::now().date_naive())
}

fn create_entry_on(
    repository: &ContentRepository,
    title: &str,
    layout: &str,
    slug: Option<&str>,
    date: NaiveDate,
) -> Result<PathBuf> {
    let slug = slug
        .map(str::to_string)
        .unwrap_or_else(|| slug::slugify(title));
    if slug.is_empty() {
        bail!("Cannot derive a file name from title {:?}", title);
    }

    let id = match layout {
        "post" => ResourceId::post(
            format!("{:04}", date.year()),
            format!("{:02}", date.month()),
            format!("{:02}", date.day()),
            slug,
        ),
        "page" => ResourceId::page(slug),
        other => bail!("Unknown layout: {}. Available: post, page", other),
    };

    let file_path = repository.locate(&id)?;
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = format!(
        "---\ntitle: {}\ncreated_at: {}\n---\n",
        quoted_scalar(title)?,
        date.format("%Y-%m-%d")
    );
    fs::write(&file_path, content)?;

    Ok(file_path)
}

/// `value` as a YAML double-quoted scalar that never contains `---`
///
/// The front-matter block ends at the first `---` anywhere, quotes or not,
/// so dash runs are broken up with `\x2D` escapes.
fn quoted_scalar(value: &str) -> Result<String> {
    // JSON strings are valid YAML double-quoted scalars
    let quoted = serde_json::to_string(value)?;
    Ok(quoted.replace("--", "-\\x2D"))
}
