//! Content repository - resolves identifiers to files under the repository root

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Page, Post, Resource, ResourceId, ResourceKind, Style};
use crate::error::{Error, Result};

/// Where the repository root comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// A plain directory
    #[default]
    Directory,
    /// The working tree of a git repository
    Git,
}

/// Read-only access to the content under one repository root
#[derive(Debug, Clone)]
pub struct ContentRepository {
    root: PathBuf,
    backend: Backend,
}

impl ContentRepository {
    /// Open a repository root, validating it up front
    pub fn open<P: AsRef<Path>>(path: P, backend: Backend) -> Result<Self> {
        let path = path.as_ref();

        let root = match backend {
            Backend::Directory => path.to_path_buf(),
            Backend::Git => git_work_tree(path)?,
        };

        if !root.is_dir() {
            return Err(misconfigured(path, "No such directory"));
        }
        let root = fs::canonicalize(&root).map_err(|e| misconfigured(path, e.to_string()))?;

        tracing::debug!("Opened {:?} repository at {:?}", backend, root);
        Ok(Self { root, backend })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The registered content types
    pub fn registry(&self) -> &'static [ResourceKind] {
        &ResourceKind::ALL
    }

    /// Directory holding resources of `kind`
    pub fn base_dir(&self, kind: ResourceKind) -> PathBuf {
        self.root.join(kind.base_dir())
    }

    /// Absolute path for an identifier. Does not touch the filesystem.
    pub fn locate(&self, id: &ResourceId) -> Result<PathBuf> {
        id.validate()?;

        let segments = id.segments();
        let mut path = self.base_dir(id.kind());
        if let Some((file, dirs)) = segments.split_last() {
            path.extend(dirs);
            // Appended rather than set, so `v1.2` stays `v1.2.md`
            path.push(format!("{}.{}", file, id.kind().extension()));
        }
        Ok(path)
    }

    /// Load any resource by identifier
    pub fn find(&self, id: ResourceId) -> Result<Resource> {
        let raw = self.read(&id)?;
        Resource::load(id, &raw)
    }

    pub fn find_page(&self, slug: &str) -> Result<Page> {
        let id = ResourceId::page(slug);
        let raw = self.read(&id)?;
        Page::parse(id, &raw)
    }

    pub fn find_post(&self, year: &str, month: &str, day: &str, slug: &str) -> Result<Post> {
        let id = ResourceId::post(year, month, day, slug);
        let raw = self.read(&id)?;
        Post::parse(id, &raw)
    }

    pub fn find_style(&self, name: &str) -> Result<Style> {
        let id = ResourceId::style(name);
        let raw = self.read(&id)?;
        Ok(Style::new(id, &raw))
    }

    fn read(&self, id: &ResourceId) -> Result<String> {
        let path = self.locate(id)?;
        if !path.is_file() {
            tracing::debug!("{} not found at {:?}", id, path);
            return Err(Error::NotFound { id: id.clone() });
        }
        fs::read_to_string(&path).map_err(|e| Error::io(path, e))
    }

    /// Every resource of `kind`, in filesystem enumeration order
    ///
    /// Files that fail to load are logged and skipped.
    pub fn all(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        let base = self.base_dir(kind);
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut resources = Vec::new();

        for entry in WalkDir::new(&base)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, kind.extension()) {
                continue;
            }

            let relative = path.strip_prefix(&base).unwrap_or(path);
            let Some(id) = ResourceId::from_relative(kind, relative) else {
                tracing::warn!("Skipping {:?}: not a valid {} location", path, kind);
                continue;
            };

            let loaded = fs::read_to_string(path)
                .map_err(|e| Error::io(path, e))
                .and_then(|raw| Resource::load(id, &raw));
            match loaded {
                Ok(resource) => resources.push(resource),
                Err(e) => tracing::warn!("Failed to load {} {:?}: {}", kind, path, e),
            }
        }

        Ok(resources)
    }

    /// Pages and posts together, for index listings
    pub fn entries(&self) -> Result<Vec<Resource>> {
        let mut entries = Vec::new();
        for kind in self.registry().iter().filter(|k| k.is_document()) {
            entries.extend(self.all(*kind)?);
        }
        Ok(entries)
    }

    /// At most `limit` resources of `kind`, most recently updated first
    pub fn recent(&self, kind: ResourceKind, limit: usize) -> Result<Vec<Resource>> {
        let mut resources = self.all(kind)?;
        sort_recent(&mut resources);
        resources.truncate(limit);
        Ok(resources)
    }
}

/// Sort by `updated_at` descending; undated last, ties by identifier
pub fn sort_recent(resources: &mut [Resource]) {
    resources.sort_by_cached_key(|r| {
        let updated = r.updated_at();
        (updated.is_none(), Reverse(updated), r.id().clone())
    });
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

fn misconfigured(path: &Path, reason: impl Into<String>) -> Error {
    Error::RepositoryMisconfigured {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Working tree of the git repository at `path`
fn git_work_tree(path: &Path) -> Result<PathBuf> {
    let repo = gix::open(path).map_err(|e| misconfigured(path, format!("Not a git repository ({e})")))?;

    if repo.is_bare() {
        return Err(misconfigured(path, "Bare git repositories have no working tree"));
    }

    repo.path()
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| misconfigured(path, "Invalid repository path"))
}
