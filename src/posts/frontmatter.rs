//! YAML front matter at the head of a markdown document.

use serde_json::{Map, Value};
use thiserror::Error;

const FENCE: &str = "---";

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front matter block is not terminated")]
    Unterminated,
    #[error("front matter is not a mapping")]
    NotAMapping,
    #[error("invalid front matter yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a document into its front matter text and body.
///
/// Returns `Ok(None)` when the document does not open with a `---` line.
pub fn split(content: &str) -> Result<Option<(&str, &str)>, FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let first = match lines.next() {
        Some(line) => line,
        None => return Ok(None),
    };
    if first.trim_end() != FENCE {
        return Ok(None);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == FENCE {
            let yaml = &content[start..offset];
            let body = &content[offset + line.len()..];
            return Ok(Some((yaml, body)));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated)
}

/// Parse the front matter of `content` into a key/value map.
///
/// A document without front matter, or with an empty block, yields an
/// empty map.
pub fn parse(content: &str) -> Result<Map<String, Value>, FrontMatterError> {
    let Some((yaml, _)) = split(content)? else {
        return Ok(Map::new());
    };
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_block() {
        let doc = "---\ntitle: Hello World\ndate: 2024-06-01\nauthor: Kozu\n---\n\n# Hello\n";
        let map = parse(doc).unwrap();
        assert_eq!(map["title"], "Hello World");
        assert_eq!(map["date"], "2024-06-01");
        assert_eq!(map["author"], "Kozu");
    }

    #[test]
    fn test_split_returns_body() {
        let doc = "---\ntitle: x\n---\nbody text\n";
        let (yaml, body) = split(doc).unwrap().unwrap();
        assert_eq!(yaml, "title: x\n");
        assert_eq!(body, "body text\n");
    }

    #[test]
    fn test_crlf_and_bom() {
        let doc = "\u{feff}---\r\ntitle: Windows\r\n---\r\nbody";
        let map = parse(doc).unwrap();
        assert_eq!(map["title"], "Windows");
    }

    #[test]
    fn test_no_front_matter_is_empty() {
        assert!(parse("# Just markdown\n").unwrap().is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_empty_block_is_empty() {
        assert!(parse("---\n---\nbody").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse("---\ntitle: never closed\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_non_mapping_block() {
        let err = parse("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAMapping));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_closing_fence_at_end_of_file() {
        let map = parse("---\nlayout: post\n---").unwrap();
        assert_eq!(map["layout"], "post");
    }
}
