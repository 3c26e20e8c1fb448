//! Bracket-path decoding of `application/x-www-form-urlencoded` bodies.
//!
//! A key such as `characters[0][id]` is split on `[`, each segment has its
//! trailing `]` removed, and the value is stored at that nested path:
//!
//! ```
//! use everglen_server::FormTree;
//!
//! let form = FormTree::parse(b"series[id]=3&characters[1][id]=9&characters[0][id]=7").unwrap();
//! assert_eq!(form.lookup("series[id]").and_then(|n| n.value()), Some("3"));
//!
//! let ids: Vec<&str> = form
//!     .lookup("characters")
//!     .unwrap()
//!     .entries()
//!     .into_iter()
//!     .filter_map(|(_, node)| node.get("id").and_then(|n| n.value()))
//!     .collect();
//! assert_eq!(ids, vec!["7", "9"]);
//! ```

use everglen_error::{FormError, FormErrorKind};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// A decoded form body: leaf values nested under bracket-path groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTree {
    /// A single submitted value
    Value(String),
    /// Named children
    Group(BTreeMap<String, FormTree>),
}

impl Default for FormTree {
    fn default() -> Self {
        FormTree::Group(BTreeMap::new())
    }
}

/// Split a bracket path into its segments.
fn segments(key: &str) -> Vec<&str> {
    key.split('[').map(|s| s.trim_end_matches(']')).collect()
}

/// Numeric segments sort numerically and before named ones.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl FormTree {
    /// Decode a form body.
    ///
    /// The first value submitted for a path wins. Blank values are dropped. A
    /// key that would turn an existing value into a group, or the reverse, is
    /// ignored.
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        std::str::from_utf8(body)
            .map_err(|e| FormError::new(FormErrorKind::Encoding(e.to_string())))?;

        let mut root = FormTree::default();
        for (key, value) in form_urlencoded::parse(body) {
            if value.trim().is_empty() {
                continue;
            }
            if !root.insert(&segments(&key), value.into_owned()) {
                debug!(key = %key, "Ignoring repeated or conflicting form key");
            }
        }
        Ok(root)
    }

    fn insert(&mut self, path: &[&str], value: String) -> bool {
        let FormTree::Group(children) = self else {
            return false;
        };
        match path {
            [] => false,
            [last] => {
                if children.contains_key(*last) {
                    return false;
                }
                children.insert((*last).to_string(), FormTree::Value(value));
                true
            }
            [head, rest @ ..] => children
                .entry((*head).to_string())
                .or_default()
                .insert(rest, value),
        }
    }

    /// The leaf value, if this node is one.
    pub fn value(&self) -> Option<&str> {
        match self {
            FormTree::Value(v) => Some(v),
            FormTree::Group(_) => None,
        }
    }

    /// Direct child by name.
    pub fn get(&self, name: &str) -> Option<&FormTree> {
        match self {
            FormTree::Group(children) => children.get(name),
            FormTree::Value(_) => None,
        }
    }

    /// Descendant addressed by a bracket path such as `series[id]`.
    pub fn lookup(&self, path: &str) -> Option<&FormTree> {
        segments(path)
            .into_iter()
            .try_fold(self, |node, segment| node.get(segment))
    }

    /// Children in index order: numeric names ascending, then other names.
    pub fn entries(&self) -> Vec<(&str, &FormTree)> {
        match self {
            FormTree::Group(children) => {
                let mut entries = children
                    .iter()
                    .map(|(k, v)| (k.as_str(), v))
                    .collect::<Vec<_>>();
                entries.sort_by(|a, b| compare_keys(a.0, b.0));
                entries
            }
            FormTree::Value(_) => Vec::new(),
        }
    }

    /// Whether this is a group with no children.
    pub fn is_empty(&self) -> bool {
        matches!(self, FormTree::Group(children) if children.is_empty())
    }

    /// Required leaf at `path`.
    pub fn required_str(&self, path: &str) -> Result<&str, FormError> {
        match self.lookup(path) {
            Some(FormTree::Value(v)) => Ok(v),
            Some(FormTree::Group(_)) => Err(FormError::new(FormErrorKind::WrongShape(
                path.to_string(),
            ))),
            None => Err(FormError::new(FormErrorKind::MissingField(
                path.to_string(),
            ))),
        }
    }

    /// Optional leaf at `path`.
    pub fn optional_str(&self, path: &str) -> Result<Option<&str>, FormError> {
        match self.lookup(path) {
            Some(FormTree::Value(v)) => Ok(Some(v)),
            Some(FormTree::Group(_)) => Err(FormError::new(FormErrorKind::WrongShape(
                path.to_string(),
            ))),
            None => Ok(None),
        }
    }

    /// Required integer leaf at `path`.
    pub fn required_i32(&self, path: &str) -> Result<i32, FormError> {
        let raw = self.required_str(path)?;
        parse_i32(path, raw)
    }

    /// Optional integer leaf at `path`.
    pub fn optional_i32(&self, path: &str) -> Result<Option<i32>, FormError> {
        self.optional_str(path)?
            .map(|raw| parse_i32(path, raw))
            .transpose()
    }
}

fn parse_i32(path: &str, raw: &str) -> Result<i32, FormError> {
    raw.trim().parse().map_err(|_| {
        FormError::new(FormErrorKind::InvalidInteger {
            field: path.to_string(),
            value: raw.to_string(),
        })
    })
}
