//! List repository content

use anyhow::Result;
use serde::Serialize;

use crate::content::{Resource, ResourceId, ResourceKind};
use crate::Glug;

/// One listed resource
#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    id: &'a ResourceId,
    url: String,
    title: Option<&'a str>,
    updated_at: Option<String>,
}

impl<'a> From<&'a Resource> for ListEntry<'a> {
    fn from(resource: &'a Resource) -> Self {
        Self {
            id: resource.id(),
            url: resource.id().url_path(),
            title: resource.title(),
            updated_at: resource.updated_at().map(|d| d.to_rfc3339()),
        }
    }
}

/// List resources by type: a kind name, `entries`, or `recent`
pub fn run(glug: &Glug, content_type: &str, json: bool) -> Result<()> {
    let repository = &glug.repository;

    let resources = match content_type {
        "recent" => repository.recent(ResourceKind::Post, glug.config.index_limit)?,
        "entry" | "entries" => repository.entries()?,
        other => {
            let kind: ResourceKind = other
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{e}, entries, recent"))?;
            repository.all(kind)?
        }
    };

    let entries: Vec<ListEntry> = resources.iter().map(ListEntry::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{} ({}):", content_type, entries.len());
    for entry in entries {
        match entry.title {
            Some(title) => println!("  {} [{}]", title, entry.url),
            None => println!("  {}", entry.url),
        }
    }

    Ok(())
}
