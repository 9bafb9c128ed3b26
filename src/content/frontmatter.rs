//! Front-matter parsing

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::helpers::parse_date_string;

/// Marker line opening and closing a front-matter block
const DELIMITER: &str = "---";

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A single scalar or a list of scalars; anything else is no tags
fn string_or_vec(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

/// Normalize a mapping key so quoted, unquoted and `:symbol` keys compare equal
fn normalize_key(key: &Value) -> Option<String> {
    let key = scalar_to_string(key)?;
    let key = key.trim();
    Some(key.strip_prefix(':').unwrap_or(key).to_string())
}

/// Front-matter attributes of a page or post
///
/// Every key is kept in `attributes`. The named fields are typed views over
/// it: a value of the wrong shape reads as absent, never as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub author: Option<String>,
    /// `created_at`, else `date`
    pub created_at: Option<String>,
    /// `updated_at`, else `updated`
    pub updated_at: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,

    /// Every key, in source order
    pub attributes: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Split raw text into front-matter and body
    ///
    /// The block must open at the very first byte. It closes at the next
    /// `---` anywhere after the opening marker, and the body is everything
    /// after that, untouched. Without a block the whole input is the body.
    pub fn parse(raw: &str) -> Result<(Self, &str)> {
        let Some(rest) = raw.strip_prefix(DELIMITER) else {
            return Ok((FrontMatter::default(), raw));
        };
        let Some(end) = rest.find(DELIMITER) else {
            return Ok((FrontMatter::default(), raw));
        };

        let yaml = &rest[..end];
        let body = &rest[end + DELIMITER.len()..];

        Ok((Self::from_yaml(yaml)?, body))
    }

    fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let value: Value = serde_yaml::from_str(yaml)?;
        let mapping = match value {
            Value::Null => return Ok(FrontMatter::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(Error::MetadataShape(format!(
                    "expected a mapping, found {}",
                    type_name(&other)
                )))
            }
        };

        let mut attributes = IndexMap::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = normalize_key(&key).ok_or_else(|| {
                Error::MetadataShape(format!("unsupported key of type {}", type_name(&key)))
            })?;
            attributes.insert(key, value);
        }

        Ok(Self::from_attributes(attributes))
    }

    fn from_attributes(attributes: IndexMap<String, Value>) -> Self {
        let scalar = |key: &str| attributes.get(key).and_then(scalar_to_string);
        let title = scalar("title");
        let author = scalar("author");
        let created_at = scalar("created_at").or_else(|| scalar("date"));
        let updated_at = scalar("updated_at").or_else(|| scalar("updated"));
        let category = scalar("category");
        let tags = attributes.get("tags").map(string_or_vec).unwrap_or_default();

        Self {
            title,
            author,
            created_at,
            updated_at,
            category,
            tags,
            attributes,
        }
    }

    /// Look up any attribute by key, as written
    pub fn get(&self, key: &str) -> Option<Value> {
        self.attributes.get(key).cloned()
    }

    /// Number of attributes present
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Parse `created_at` into a DateTime
    pub fn parse_created_at(&self) -> Option<DateTime<Local>> {
        self.created_at.as_deref().and_then(parse_date_string)
    }

    /// Parse `updated_at` into a DateTime
    pub fn parse_updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at.as_deref().and_then(parse_date_string)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_all_content() {
        let data = "plain text test\n";
        let (fm, body) = FrontMatter::parse(data).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, data);
    }

    #[test]
    fn test_yaml_into_attributes_rest_into_content() {
        let data = "---\nfoo: bar\nbaz: [quux]\n--- \ntext content\n";
        let (fm, body) = FrontMatter::parse(data).unwrap();

        assert_eq!(body, " \ntext content\n");
        assert_eq!(body.trim(), "text content");
        assert_eq!(fm.len(), 2);
        assert_eq!(fm.get("foo"), Some(Value::String("bar".into())));
        assert_eq!(
            fm.get("baz"),
            Some(Value::Sequence(vec![Value::String("quux".into())]))
        );
    }

    #[test]
    fn test_title_accessor() {
        let (fm, body) = FrontMatter::parse("---\ntitle: foo\n---\ncontent").unwrap();
        assert_eq!(fm.title.as_deref(), Some("foo"));
        assert_eq!(body, "\ncontent");

        let (fm, _) = FrontMatter::parse("---\nfoo: bar\n---\ncontent").unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(fm.get("title"), None);
    }

    #[test]
    fn test_well_known_fields() {
        let data = r#"---
title: Hello World
author: Jane
date: 2024-01-15 10:30:00
updated: 2024-02-01
category: notes
tags:
  - rust
  - wiki
---
Body
"#;
        let (fm, body) = FrontMatter::parse(data).unwrap();
        assert_eq!(fm.author.as_deref(), Some("Jane"));
        assert_eq!(fm.category.as_deref(), Some("notes"));
        assert_eq!(fm.tags, vec!["rust", "wiki"]);
        assert_eq!(
            fm.parse_created_at().unwrap().format("%Y-%m-%d").to_string(),
            "2024-01-15"
        );
        assert_eq!(
            fm.parse_updated_at().unwrap().format("%Y-%m-%d").to_string(),
            "2024-02-01"
        );
        assert_eq!(body, "\nBody\n");
        assert_eq!(fm.len(), 6);
    }

    #[test]
    fn test_single_string_tags_and_numeric_title() {
        let (fm, _) = FrontMatter::parse("---\ntitle: 2008\ntags: Notes\n---\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("2008"));
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_symbol_and_quoted_keys_normalize() {
        let data = "---\n:title: sym\n\"author\": quoted\n---\n";
        let (fm, _) = FrontMatter::parse(data).unwrap();
        assert_eq!(fm.title.as_deref(), Some("sym"));
        assert_eq!(fm.author.as_deref(), Some("quoted"));
    }

    #[test]
    fn test_nested_mapping_kept_in_attributes() {
        let data = "---\nlinks:\n  home: /\n  feed: /atom.xml\n---\n";
        let (fm, _) = FrontMatter::parse(data).unwrap();
        let links = fm.get("links").unwrap();
        assert_eq!(links["feed"], Value::String("/atom.xml".into()));
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = FrontMatter::parse("---\n---\nbody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "\nbody");
    }

    #[test]
    fn test_opening_marker_must_be_first() {
        let data = "\n---\ntitle: late\n---\nbody";
        let (fm, body) = FrontMatter::parse(data).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, data);
    }

    #[test]
    fn test_unclosed_block_is_content() {
        let data = "---\ntitle: never closed\n";
        let (fm, body) = FrontMatter::parse(data).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, data);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, Error::MetadataParse(_)));
    }

    #[test]
    fn test_date_and_created_at_together() {
        let data = "---\ndate: 2008-01-01\ncreated_at: 2008-01-02\nupdated: 2008-02-01\nupdated_at: 2008-02-02\n---\nbody";
        let (fm, body) = FrontMatter::parse(data).unwrap();
        assert_eq!(fm.created_at.as_deref(), Some("2008-01-02"));
        assert_eq!(fm.updated_at.as_deref(), Some("2008-02-02"));
        assert_eq!(fm.get("date"), Some(Value::String("2008-01-01".into())));
        assert_eq!(fm.get("updated"), Some(Value::String("2008-02-01".into())));
        assert_eq!(fm.len(), 4);
        assert_eq!(body, "\nbody");
    }

    #[test]
    fn test_non_scalar_well_known_fields_read_as_absent() {
        let data = "---\ntitle:\n  en: Hello\nauthor: [a, b]\ncategory: [a, b]\n---\n";
        let (fm, _) = FrontMatter::parse(data).unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(fm.author, None);
        assert_eq!(fm.category, None);
        assert_eq!(
            fm.get("category"),
            Some(Value::Sequence(vec![
                Value::String("a".into()),
                Value::String("b".into())
            ]))
        );
        assert_eq!(fm.get("title").unwrap()["en"], Value::String("Hello".into()));
    }

    #[test]
    fn test_scalar_tags() {
        let (fm, _) = FrontMatter::parse("---\ntags: 2008\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["2008"]);

        let (fm, _) = FrontMatter::parse("---\ntags: true\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["true"]);

        let (fm, _) = FrontMatter::parse("---\ntags: [rust, 2]\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["rust", "2"]);

        let (fm, _) = FrontMatter::parse("---\ntags:\n  nested: map\n---\n").unwrap();
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_scalar_block_is_an_error() {
        let err = FrontMatter::parse("---\njust a sentence\n---\nbody").unwrap_err();
        assert!(matches!(err, Error::MetadataShape(_)));
    }
}
