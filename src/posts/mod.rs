/*!
 * Posts Module
 * Discovers markdown posts and builds the newest-first blog index
 */
pub mod discovery;
pub mod frontmatter;
pub mod slug;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};

pub use discovery::{discover, PostDocument, PAGE_FILE};

/// Front matter of a post.
///
/// Keys other than the four known ones are kept in `extra` and serialized
/// alongside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostMetadata {
    /// Lift the known fields out of a parsed front matter map.
    ///
    /// Scalars are accepted as text (`date: 2024` becomes `"2024"`).
    /// Anything else is left in `extra` untouched.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let title = take_text(&mut map, "title");
        let date = take_text(&mut map, "date");
        let author = take_text(&mut map, "author");
        let layout = take_text(&mut map, "layout");
        Self {
            title,
            date,
            author,
            layout,
            extra: map,
        }
    }
}

fn take_text(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    let text = match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        _ => return None,
    };
    map.remove(key);
    text
}

/// One entry of the blog index: the derived slug merged with the metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub slug: String,
    #[serde(flatten)]
    pub metadata: PostMetadata,
}

impl PostSummary {
    /// The post's date as an instant, if it parses.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.metadata.date.as_deref().and_then(parse_date)
    }
}

/// Parse a front matter date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339, and `YYYY-MM-DDTHH:MM:SS` (taken as UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Merge a discovered document's slug and metadata into a summary.
///
/// A `slug` string in the front matter wins over the one taken from the
/// path, since metadata is applied last.
pub fn summarize(doc: PostDocument) -> PostSummary {
    let PostDocument { path, mut metadata } = doc;

    let mut slug = slug::slug_from_path(&path).unwrap_or_default().to_string();
    match metadata.extra.remove("slug") {
        Some(Value::String(s)) => slug = s,
        Some(other) => {
            tracing::warn!(path = %path, value = %other, "ignoring non-text slug in front matter");
        }
        None => {}
    }

    if slug.is_empty() {
        tracing::warn!(path = %path, "could not derive slug, using empty slug");
    }

    let summary = PostSummary { slug, metadata };
    match summary.metadata.date.as_deref() {
        None => tracing::warn!(path = %path, "post has no date"),
        Some(date) if summary.published_at().is_none() => {
            tracing::warn!(path = %path, date = %date, "post date does not parse")
        }
        Some(_) => {}
    }
    summary
}

/// Sort newest first. Stable, so equal dates keep their input order;
/// posts without a usable date go last.
pub fn sort_newest_first(posts: &mut [PostSummary]) {
    posts.sort_by_cached_key(|post| Reverse(post.published_at()));
}

/// Merge and sort a set of discovered documents.
pub fn build_index(docs: Vec<PostDocument>) -> Vec<PostSummary> {
    let mut posts: Vec<PostSummary> = docs.into_iter().map(summarize).collect();
    sort_newest_first(&mut posts);
    posts
}

/// Scan `root` and build its index. Blocking.
pub fn load_index(root: &Path) -> Vec<PostSummary> {
    let posts = build_index(discover(root));
    tracing::debug!(root = %root.display(), count = posts.len(), "built post index");
    posts
}

/// [`load_index`] on the blocking thread pool.
pub async fn load_index_async(root: PathBuf) -> Result<Vec<PostSummary>, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || load_index(&root)).await
}
