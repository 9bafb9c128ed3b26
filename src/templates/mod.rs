//! HTML templates using the Tera template engine
//!
//! Default templates are embedded in the binary. Any `*.html` file in the
//! repository's `templates/` directory replaces the default of the same name.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Page, Post, Resource};
use crate::error::{Error, Result};
use crate::helpers::{format_date, parse_date_string};

const DEFAULT_TEMPLATES: [(&str, &str); 4] = [
    ("layout.html", include_str!("default/layout.html")),
    ("index.html", include_str!("default/index.html")),
    ("page.html", include_str!("default/page.html")),
    ("post.html", include_str!("default/post.html")),
];

/// Template renderer
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with only the built-in templates
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Self::build(Vec::new(), config)
    }

    /// Create a renderer, letting files in `dir` override the built-ins
    pub fn load<P: AsRef<Path>>(dir: P, config: &SiteConfig) -> Result<Self> {
        let dir = dir.as_ref();
        let mut overrides = Vec::new();

        if dir.is_dir() {
            for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some("html")
                {
                    continue;
                }
                let name = path
                    .strip_prefix(dir)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .replace('\\', "/");
                let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                tracing::debug!("Loaded template {} from {:?}", name, path);
                overrides.push((name, source));
            }
        }

        Self::build(overrides, config)
    }

    fn build(overrides: Vec<(String, String)>, config: &SiteConfig) -> Result<Self> {
        let mut templates: HashMap<String, String> = DEFAULT_TEMPLATES
            .iter()
            .map(|(name, source)| (name.to_string(), source.to_string()))
            .collect();
        templates.extend(overrides);

        let mut tera = Tera::default();

        // Rendered Markdown and URLs go out verbatim
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(templates)?;

        let date_format = config.date_format.clone();
        tera.register_filter(
            "date_format",
            move |value: &tera::Value, args: &HashMap<String, tera::Value>| {
                let s = tera::try_get_value!("date_format", "value", String, value);
                let format = match args.get("format") {
                    Some(val) => tera::try_get_value!("date_format", "format", String, val),
                    None => date_format.clone(),
                };
                // Anything we cannot parse is shown as written
                let formatted = parse_date_string(&s)
                    .map(|date| format_date(&date, &format))
                    .unwrap_or(s);
                Ok(tera::Value::String(formatted))
            },
        );

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub url: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    /// Front-matter title, falling back to the slug
    pub title: String,
    pub url: String,
    /// Rendered HTML; empty in listings
    pub content: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Every front-matter attribute, for custom templates
    pub attributes: HashMap<String, serde_yaml::Value>,
}

impl PageData {
    /// Summary of a page for listings, without rendering its body
    pub fn summary(page: &Page) -> Self {
        Self::build(page, page.created_at().map(|d| d.to_rfc3339()), String::new())
    }

    /// Page with its body rendered
    pub fn rendered(page: &Page, renderer: &MarkdownRenderer) -> Self {
        Self::build(
            page,
            page.created_at().map(|d| d.to_rfc3339()),
            page.content_html(renderer),
        )
    }

    /// Post with its body rendered; `created_at` falls back to the post's path date
    pub fn rendered_post(post: &Post, renderer: &MarkdownRenderer) -> Self {
        Self::build(
            post,
            post.created_at().map(|d| d.to_rfc3339()),
            post.content_html(renderer),
        )
    }

    /// Listing entry for any document resource
    pub fn from_resource(resource: &Resource) -> Option<Self> {
        let page = resource.as_page()?;
        Some(Self::build(
            page,
            resource.created_at().map(|d| d.to_rfc3339()),
            String::new(),
        ))
    }

    fn build(page: &Page, created_at: Option<String>, content: String) -> Self {
        let attributes = page
            .front_matter()
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            title: page
                .title()
                .map(str::to_string)
                .unwrap_or_else(|| page.id().segments().last().unwrap_or(&"").to_string()),
            url: page.id().url_path(),
            content,
            author: page.author().map(str::to_string),
            category: page.category().map(str::to_string),
            tags: page.tags().to_vec(),
            created_at,
            updated_at: page.updated_at().map(|d| d.to_rfc3339()),
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ResourceId;

    fn site_context(config: &SiteConfig) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(config));
        context
    }

    #[test]
    fn test_render_page_template() {
        let config = SiteConfig::default();
        let renderer = TemplateRenderer::new(&config).unwrap();
        let page = Page::parse(ResourceId::page("about"), "---\ntitle: About\n---\n# Hi").unwrap();

        let mut context = site_context(&config);
        context.insert("page", &PageData::rendered(&page, &MarkdownRenderer::new()));
        let html = renderer.render("page.html", &context).unwrap();

        assert!(html.contains("<title>About | Glug</title>"));
        assert!(html.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn test_render_post_template_with_path_date() {
        let config = SiteConfig::default();
        let renderer = TemplateRenderer::new(&config).unwrap();
        let post = Post::parse(
            ResourceId::post("2008", "01", "02", "hello"),
            "---\ntags: [a, b]\n---\nBody",
        )
        .unwrap();

        let mut context = site_context(&config);
        context.insert("page", &PageData::rendered_post(&post, &MarkdownRenderer::new()));
        let html = renderer.render("post.html", &context).unwrap();

        assert!(html.contains("<h1>hello</h1>"));
        assert!(html.contains(">2008-01-02</time>"));
        assert!(html.contains("<li>a</li><li>b</li>"));
    }

    #[test]
    fn test_repository_templates_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.html"), "custom {{ page.title }}").unwrap();

        let config = SiteConfig::default();
        let renderer = TemplateRenderer::load(dir.path(), &config).unwrap();
        assert!(renderer.has_template("post.html"));

        let page = Page::parse(ResourceId::page("x"), "---\ntitle: X\n---\n").unwrap();
        let mut context = site_context(&config);
        context.insert("page", &PageData::summary(&page));
        assert_eq!(renderer.render("page.html", &context).unwrap(), "custom X");
    }

    #[test]
    fn test_date_format_filter_keeps_literal_percent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("page.html"),
            r#"{{ page.created_at | date_format }}|{{ page.created_at | date_format(format="YYYY 100%") }}"#,
        )
        .unwrap();

        let config = SiteConfig {
            date_format: "%DD%".to_string(),
            ..SiteConfig::default()
        };
        let renderer = TemplateRenderer::load(dir.path(), &config).unwrap();
        let page = Page::parse(ResourceId::page("x"), "---\ncreated_at: 2008-01-02\n---\n").unwrap();
        let mut context = site_context(&config);
        context.insert("page", &PageData::summary(&page));

        assert_eq!(renderer.render("page.html", &context).unwrap(), "%02%|2008 100%");
    }

    #[test]
    fn test_broken_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.html"), "{% if %}").unwrap();
        let err = TemplateRenderer::load(dir.path(), &SiteConfig::default()).err();
        assert!(matches!(err, Some(Error::Template(_))));
    }

    #[test]
    fn test_page_data_attributes() {
        let page = Page::parse(
            ResourceId::page("x"),
            "---\ntitle: T\nmood: calm\n---\n",
        )
        .unwrap();
        let data = PageData::summary(&page);
        assert_eq!(data.url, "/x");
        assert_eq!(data.attributes.len(), 2);
        assert_eq!(
            data.attributes.get("mood"),
            Some(&serde_yaml::Value::String("calm".into()))
        );
    }
}
