//! glug: a flat-file blog and wiki engine
//!
//! Pages and dated posts live as Markdown files with YAML front-matter under
//! a repository root, next to Sass stylesheets and Tera templates. This crate
//! resolves, loads and renders them, and serves the result over HTTP.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;
pub mod templates;

use std::path::Path;
use tera::Context;

use config::SiteConfig;
use content::{Backend, ContentRepository, MarkdownRenderer, ResourceKind, StyleCompiler};
pub use error::{Error, Result};
use templates::{PageData, SiteData, TemplateRenderer};

/// The application: everything needed to answer a request, built once at startup
pub struct Glug {
    /// Site configuration
    pub config: SiteConfig,
    /// Content under the repository root
    pub repository: ContentRepository,
    /// Markdown renderer for pages and posts
    pub markdown: MarkdownRenderer,
    /// Sass compiler for stylesheets
    pub styles: StyleCompiler,
    /// HTML templates
    pub templates: TemplateRenderer,
}

impl Glug {
    /// Open a repository root and load everything that hangs off it
    pub fn open<P: AsRef<Path>>(root: P, backend: Backend) -> Result<Self> {
        let repository = ContentRepository::open(root, backend)?;
        let config = SiteConfig::load_from_root(repository.root())?;
        let templates = TemplateRenderer::load(repository.root().join("templates"), &config)?;
        let markdown = MarkdownRenderer::with_config(&config.highlight);
        let styles = StyleCompiler::new(&config.style)
            .with_load_path(repository.base_dir(ResourceKind::Style));

        tracing::info!("Serving content from {:?}", repository.root());

        Ok(Self {
            config,
            repository,
            markdown,
            styles,
            templates,
        })
    }

    fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(&self.config));
        context
    }

    /// Home page: the index page, if there is one, and the most recent posts
    pub fn render_index(&self) -> Result<String> {
        let page = match self.repository.find_page(&self.config.index_page) {
            Ok(page) => Some(PageData::rendered(&page, &self.markdown)),
            Err(Error::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        let posts: Vec<PageData> = self
            .repository
            .recent(ResourceKind::Post, self.config.index_limit)?
            .iter()
            .filter_map(PageData::from_resource)
            .collect();

        let mut context = self.context();
        context.insert("page", &page);
        context.insert("posts", &posts);
        self.templates.render("index.html", &context)
    }

    pub fn render_page(&self, slug: &str) -> Result<String> {
        let page = self.repository.find_page(slug)?;
        let mut context = self.context();
        context.insert("page", &PageData::rendered(&page, &self.markdown));
        self.templates.render("page.html", &context)
    }

    pub fn render_post(&self, year: &str, month: &str, day: &str, slug: &str) -> Result<String> {
        let post = self.repository.find_post(year, month, day, slug)?;
        let mut context = self.context();
        context.insert("page", &PageData::rendered_post(&post, &self.markdown));
        self.templates.render("post.html", &context)
    }

    /// Compiled CSS for `styles/<name>.sass`
    pub fn render_style(&self, name: &str) -> Result<String> {
        self.repository.find_style(name)?.content_css(&self.styles)
    }
}
