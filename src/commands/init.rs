//! Bootstrap a new content repository

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Glug configuration

# Site
title: Glug
subtitle: ''
author: ''
url: http://localhost:4567

# Home page
index_page: index
index_limit: 10

# Date format
date_format: YYYY-MM-DD

highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: true

# Stylesheets under styles/. Files end in .sass but are read as SCSS
# (braces and semicolons); set syntax: sass for the indented syntax.
style:
  syntax: scss
  output: expanded
"#;

const INDEX_PAGE: &str = r#"---
title: Home
---
Welcome to your new wiki. Edit `pages/index.md` to change this page.
"#;

const MAIN_STYLE: &str = r#"$text: #222;
$accent: #b4451f;

body {
  color: $text;
  font-family: Georgia, serif;
  max-width: 42rem;
  margin: 0 auto;

  a { color: $accent; }
}
"#;

/// Initialize a repository root in the given directory
///
/// Existing files are left alone, so this is safe to run on a partly
/// provisioned root.
pub fn init_site(target_dir: &Path, git: bool) -> Result<()> {
    for dir in ["pages", "posts", "styles", "templates"] {
        fs::create_dir_all(target_dir.join(dir))?;
    }

    write_if_missing(&target_dir.join("_config.yml"), CONFIG)?;
    write_if_missing(&target_dir.join("pages/index.md"), INDEX_PAGE)?;
    write_if_missing(&target_dir.join("styles/main.sass"), MAIN_STYLE)?;

    if git {
        if target_dir.join(".git").exists() {
            tracing::info!("{:?} is already a git repository", target_dir);
        } else {
            gix::init(target_dir)?;
            tracing::info!("Initialized git repository in {:?}", target_dir);
        }
    }

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::debug!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Backend;
    use crate::Glug;

    #[test]
    fn test_init_creates_servable_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("wiki");
        init_site(&root, false).unwrap();

        for sub in ["pages", "posts", "styles", "templates"] {
            assert!(root.join(sub).is_dir());
        }

        let glug = Glug::open(&root, Backend::Directory).unwrap();
        assert!(glug.render_index().unwrap().contains("Welcome to your new wiki"));
        assert!(glug.render_style("main").unwrap().contains("color: #b4451f"));
    }

    #[test]
    fn test_init_config_reads_styles_as_scss() {
        use crate::config::{SiteConfig, StyleSyntax};

        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path(), false).unwrap();

        let config = SiteConfig::load_from_root(dir.path()).unwrap();
        assert_eq!(config.style.syntax, StyleSyntax::Scss);
        assert!(CONFIG.contains("set syntax: sass for the indented syntax"));
        assert!(MAIN_STYLE.contains('{'));
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/index.md"), "mine").unwrap();

        init_site(dir.path(), false).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("pages/index.md")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn test_init_with_git() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path(), true).unwrap();
        assert!(dir.path().join(".git").exists());
        assert!(Glug::open(dir.path(), Backend::Git).is_ok());

        // Running again must not fail on the existing repository
        init_site(dir.path(), true).unwrap();
    }
}
