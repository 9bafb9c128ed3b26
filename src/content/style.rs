//! Sass/SCSS compilation

use std::path::PathBuf;

use grass::{InputSyntax, OutputStyle};

use crate::config::{StyleConfig, StyleOutput, StyleSyntax};
use crate::error::{Error, Result};

/// Compiles stylesheet sources to CSS
pub struct StyleCompiler {
    config: StyleConfig,
    load_path: Option<PathBuf>,
}

impl StyleCompiler {
    pub fn new(config: &StyleConfig) -> Self {
        Self {
            config: config.clone(),
            load_path: None,
        }
    }

    /// Resolve `@import`/`@use` relative to this directory
    pub fn with_load_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.load_path = Some(dir.into());
        self
    }

    /// Compile source to CSS, failing on the first compiler error
    pub fn compile(&self, source: &str) -> Result<String> {
        let syntax = match self.config.syntax {
            StyleSyntax::Scss => InputSyntax::Scss,
            StyleSyntax::Sass => InputSyntax::Sass,
        };
        let style = match self.config.output {
            StyleOutput::Expanded => OutputStyle::Expanded,
            StyleOutput::Compressed => OutputStyle::Compressed,
        };

        let mut options = grass::Options::default()
            .input_syntax(syntax)
            .style(style);
        if let Some(dir) = &self.load_path {
            options = options.load_path(dir);
        }

        grass::from_string(source.to_string(), &options).map_err(|e| Error::Render(e.to_string()))
    }
}

impl Default for StyleCompiler {
    fn default() -> Self {
        Self::new(&StyleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_nested_scss() {
        let css = StyleCompiler::default()
            .compile(".a { .b { color: red; } }")
            .unwrap();
        assert!(css.contains(".a .b"));
        assert!(css.contains("color: red"));
    }

    #[test]
    fn test_compile_variables() {
        let css = StyleCompiler::default()
            .compile("$fg: #333;\nbody { color: $fg; }")
            .unwrap();
        assert!(css.contains("color: #333"));
    }

    #[test]
    fn test_compressed_output() {
        let compiler = StyleCompiler::new(&StyleConfig {
            output: StyleOutput::Compressed,
            ..StyleConfig::default()
        });
        let css = compiler.compile("a { color: red; }").unwrap();
        assert!(css.contains("a{color:red}"));
    }

    #[test]
    fn test_compile_error_is_render_error() {
        let err = StyleCompiler::default().compile("a { color: $missing; }").unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_import_from_load_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("_colors.scss"), "$accent: blue;").unwrap();

        let css = StyleCompiler::default()
            .with_load_path(dir.path())
            .compile("@import 'colors';\na { color: $accent; }")
            .unwrap();
        assert!(css.contains("color: blue"));
    }
}
