//! Page, Post and Style models

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::path::{Component, Path};
use std::str::FromStr;

use super::{FrontMatter, MarkdownRenderer, StyleCompiler};
use crate::error::{Error, Result};

/// The closed set of content types a repository holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Page,
    Post,
    Style,
}

impl ResourceKind {
    /// Every registered content type
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Page, ResourceKind::Post, ResourceKind::Style];

    /// Directory under the repository root holding this kind
    pub fn base_dir(self) -> &'static str {
        match self {
            ResourceKind::Page => "pages",
            ResourceKind::Post => "posts",
            ResourceKind::Style => "styles",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ResourceKind::Page | ResourceKind::Post => "md",
            ResourceKind::Style => "sass",
        }
    }

    /// Whether files of this kind carry front-matter and Markdown
    pub fn is_document(self) -> bool {
        !matches!(self, ResourceKind::Style)
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Page => "page",
            ResourceKind::Post => "post",
            ResourceKind::Style => "style",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" | "pages" => Ok(ResourceKind::Page),
            "post" | "posts" => Ok(ResourceKind::Post),
            "style" | "styles" => Ok(ResourceKind::Style),
            other => Err(format!("Unknown type: {other}. Available: page, post, style")),
        }
    }
}

/// Identifies one resource, in the shape its kind is addressed by
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResourceId {
    Page {
        slug: String,
    },
    Post {
        year: String,
        month: String,
        day: String,
        slug: String,
    },
    Style {
        name: String,
    },
}

impl ResourceId {
    pub fn page(slug: impl Into<String>) -> Self {
        ResourceId::Page { slug: slug.into() }
    }

    pub fn post(
        year: impl Into<String>,
        month: impl Into<String>,
        day: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        ResourceId::Post {
            year: year.into(),
            month: month.into(),
            day: day.into(),
            slug: slug.into(),
        }
    }

    pub fn style(name: impl Into<String>) -> Self {
        ResourceId::Style { name: name.into() }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceId::Page { .. } => ResourceKind::Page,
            ResourceId::Post { .. } => ResourceKind::Post,
            ResourceId::Style { .. } => ResourceKind::Style,
        }
    }

    /// Path segments below the kind's base directory, extension not included
    pub fn segments(&self) -> Vec<&str> {
        match self {
            ResourceId::Page { slug } => vec![slug.as_str()],
            ResourceId::Post {
                year,
                month,
                day,
                slug,
            } => vec![year.as_str(), month.as_str(), day.as_str(), slug.as_str()],
            ResourceId::Style { name } => vec![name.as_str()],
        }
    }

    /// Validate every segment, rejecting anything that could leave the base directory
    pub fn validate(&self) -> Result<()> {
        self.segments().into_iter().try_for_each(validate_segment)
    }

    /// URL path this resource is served under
    pub fn url_path(&self) -> String {
        match self {
            ResourceId::Page { slug } => format!("/{slug}"),
            ResourceId::Post { .. } => format!("/{}", self.segments().join("/")),
            ResourceId::Style { name } => format!("/styles/{name}.css"),
        }
    }

    /// Rebuild an identifier from a file path relative to the kind's base directory
    pub(crate) fn from_relative(kind: ResourceKind, relative: &Path) -> Option<Self> {
        let stem = relative.with_extension("");
        let parts = stem
            .components()
            .map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        match kind {
            ResourceKind::Page => Some(ResourceId::page(parts.join("/"))),
            ResourceKind::Style => Some(ResourceId::style(parts.join("/"))),
            ResourceKind::Post => match parts.as_slice() {
                [year, month, day, slug] => Some(ResourceId::post(*year, *month, *day, *slug)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind(), self.segments().join("/"))
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    let mut components = Path::new(segment).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if segment.is_empty() || segment.contains(['/', '\\', '\0']) || !single_normal {
        return Err(Error::PathTraversal {
            segment: segment.to_string(),
        });
    }
    Ok(())
}

/// A static page: front-matter plus a Markdown body
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    id: ResourceId,
    front_matter: FrontMatter,
    content: String,
}

impl Page {
    /// Build a page from raw file contents
    pub fn parse(id: ResourceId, raw: &str) -> Result<Self> {
        let (front_matter, body) = FrontMatter::parse(raw)?;
        Ok(Self {
            id,
            front_matter,
            content: body.to_string(),
        })
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    /// Body text after the front-matter block
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Render the body to HTML; recomputed on every call
    pub fn content_html(&self, renderer: &MarkdownRenderer) -> String {
        renderer.render(&self.content)
    }

    pub fn title(&self) -> Option<&str> {
        self.front_matter.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.front_matter.author.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.front_matter.category.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.front_matter.tags
    }

    pub fn created_at(&self) -> Option<DateTime<Local>> {
        self.front_matter.parse_created_at()
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.front_matter.parse_updated_at()
    }

    /// Any attribute by key
    pub fn get(&self, key: &str) -> Option<serde_yaml::Value> {
        self.front_matter.get(key)
    }
}

/// A dated entry: a page addressed by year, month, day and slug
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    page: Page,
}

impl Post {
    pub fn parse(id: ResourceId, raw: &str) -> Result<Self> {
        Ok(Self {
            page: Page::parse(id, raw)?,
        })
    }

    /// Calendar date encoded in the identifier, if its segments are numeric
    pub fn date(&self) -> Option<NaiveDate> {
        match &self.page.id {
            ResourceId::Post {
                year, month, day, ..
            } => NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?),
            _ => None,
        }
    }

    /// `created_at` from front-matter, else midnight of the identifier's date
    pub fn created_at(&self) -> Option<DateTime<Local>> {
        self.page.created_at().or_else(|| {
            let midnight = self.date()?.and_hms_opt(0, 0, 0)?;
            Local.from_local_datetime(&midnight).earliest()
        })
    }

    pub fn slug(&self) -> &str {
        match &self.page.id {
            ResourceId::Post { slug, .. } => slug,
            _ => "",
        }
    }

    pub fn into_page(self) -> Page {
        self.page
    }
}

impl Deref for Post {
    type Target = Page;

    fn deref(&self) -> &Page {
        &self.page
    }
}

/// A stylesheet; its whole file is source, no front-matter
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    id: ResourceId,
    content: String,
}

impl Style {
    pub fn new(id: ResourceId, raw: &str) -> Self {
        Self {
            id,
            content: raw.to_string(),
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Compile the source to CSS
    pub fn content_css(&self, compiler: &StyleCompiler) -> Result<String> {
        compiler.compile(&self.content)
    }
}

/// Any loaded resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Page(Page),
    Post(Post),
    Style(Style),
}

impl Resource {
    /// Construct the resource type matching `id` from raw file contents
    pub fn load(id: ResourceId, raw: &str) -> Result<Self> {
        Ok(match id.kind() {
            ResourceKind::Page => Resource::Page(Page::parse(id, raw)?),
            ResourceKind::Post => Resource::Post(Post::parse(id, raw)?),
            ResourceKind::Style => Resource::Style(Style::new(id, raw)),
        })
    }

    pub fn id(&self) -> &ResourceId {
        match self {
            Resource::Page(page) => page.id(),
            Resource::Post(post) => post.id(),
            Resource::Style(style) => style.id(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.id().kind()
    }

    pub fn content(&self) -> &str {
        match self {
            Resource::Page(page) => page.content(),
            Resource::Post(post) => post.content(),
            Resource::Style(style) => style.content(),
        }
    }

    /// Underlying page for documents; `None` for stylesheets
    pub fn as_page(&self) -> Option<&Page> {
        match self {
            Resource::Page(page) => Some(page),
            Resource::Post(post) => Some(&post.page),
            Resource::Style(_) => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.as_page().and_then(Page::title)
    }

    pub fn created_at(&self) -> Option<DateTime<Local>> {
        match self {
            Resource::Page(page) => page.created_at(),
            Resource::Post(post) => post.created_at(),
            Resource::Style(_) => None,
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.as_page().and_then(Page::updated_at)
    }
}
