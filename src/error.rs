//! Error types shared by the content model and the HTTP layer

use std::path::PathBuf;
use thiserror::Error;

use crate::content::ResourceId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while resolving, loading or rendering content
#[derive(Debug, Error)]
pub enum Error {
    #[error("{id} not found")]
    NotFound { id: ResourceId },

    #[error("Failed to parse front-matter")]
    MetadataParse(#[from] serde_yaml::Error),

    #[error("Invalid front-matter: {0}")]
    MetadataShape(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Template error")]
    Template(#[from] tera::Error),

    #[error("Rejected path segment `{segment}`")]
    PathTraversal { segment: String },

    #[error("{path}: {reason}. Create a content repository with `glug init {path}`")]
    RepositoryMisconfigured { path: PathBuf, reason: String },

    #[error("IO error when reading `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file `{path}`")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the request itself was at fault rather than the content
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::PathTraversal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_not_found_display_carries_identifier() {
        let err = Error::NotFound {
            id: ResourceId::post("2008", "01", "01", "testpost"),
        };
        let display = format!("{err}");
        assert!(display.contains("2008/01/01/testpost"));
        assert!(display.contains("not found"));
    }

    #[test]
    fn test_misconfigured_display_mentions_init() {
        let err = Error::RepositoryMisconfigured {
            path: PathBuf::from("/srv/wiki"),
            reason: "Not a git repository".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("/srv/wiki: Not a git repository"));
        assert!(display.contains("glug init /srv/wiki"));
    }

    #[test]
    fn test_client_errors() {
        let traversal = Error::PathTraversal {
            segment: "..".to_string(),
        };
        assert!(traversal.is_client_error());

        let io = Error::io("x.md", std::io::Error::new(ErrorKind::Other, "boom"));
        assert!(!io.is_client_error());
        assert!(format!("{io}").contains("x.md"));
    }
}
