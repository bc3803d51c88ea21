//! Eager scan of the content root for post documents.

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{frontmatter, PostMetadata};

/// File name every post document carries.
pub const PAGE_FILE: &str = "+page.md";

/// A post found on disk: its content-relative path and its front matter.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDocument {
    /// Relative to the content root, as `./<dir>/+page.md`.
    pub path: String,
    pub metadata: PostMetadata,
}

impl PostDocument {
    /// Build a document from its relative path and raw source.
    ///
    /// Front matter that does not parse leaves the metadata empty.
    pub fn from_source(path: String, source: &str) -> Self {
        let metadata = match frontmatter::parse(source) {
            Ok(map) => PostMetadata::from_map(map),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "unusable front matter, using empty metadata");
                PostMetadata::default()
            }
        };
        Self { path, metadata }
    }
}

/// Path of `file` relative to `root`, written `./a/b/+page.md`.
fn relative_path(root: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(format!("./{}", parts.join("/")))
}

/// Find every `+page.md` below `root`, at any depth, in file name order.
///
/// A missing root yields nothing. A document that cannot be read is still
/// listed, with empty metadata.
pub fn discover(root: &Path) -> Vec<PostDocument> {
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "post content directory not found");
        return Vec::new();
    }

    let mut docs = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != PAGE_FILE {
            continue;
        }

        let Some(path) = relative_path(root, entry.path()) else {
            continue;
        };

        let source = match fs::read_to_string(entry.path()) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "could not read post");
                String::new()
            }
        };

        docs.push(PostDocument::from_source(path, &source));
    }

    tracing::debug!(root = %root.display(), count = docs.len(), "discovered posts");
    docs
}
