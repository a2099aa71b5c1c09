//! Dotted path addressing.
//!
//! A path such as `SourceData.Customer.FirstName` names a field inside a
//! schema tree. Its first segment is the schema's root name, which never
//! appears as a key inside a JSON document, so document lookups skip it.

use crate::error::PathError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A parsed, validated dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Splits `path` on `.` and rejects empty paths and empty segments.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment(path.to_string()));
        }
        Ok(Self { segments })
    }

    /// Builds a path from a root name and child segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.iter().any(|s| s.is_empty() || s.contains('.')) {
            return Err(PathError::EmptySegment(segments.join(".")));
        }
        Ok(Self { segments })
    }

    /// A path naming only a schema root. The name is taken as is.
    pub(crate) fn root_only(name: &str) -> Self {
        Self {
            segments: vec![name.to_string()],
        }
    }

    /// The schema root name this path is anchored at.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Every segment below the root, i.e. the keys used inside a document.
    pub fn document_segments(&self) -> &[String] {
        &self.segments[1..]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a parsed path has at least its root segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with `name` appended.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Looks up the value this path addresses in `document`.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let mut current = document;
        for segment in self.document_segments() {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Writes `value` at this path, creating missing intermediate objects.
    pub fn assign(&self, document: &mut Value, value: Value) -> Result<(), PathError> {
        let Some((last, intermediate)) = self.document_segments().split_last() else {
            return Err(PathError::MissingFieldSegment(self.to_string()));
        };

        if !document.is_object() && !document.is_array() {
            *document = Value::Object(Map::new());
        }

        let mut current = document;
        for segment in intermediate {
            current = self.descend_or_create(current, segment)?;
        }

        match current {
            Value::Object(map) => {
                map.insert(last.clone(), value);
                Ok(())
            }
            Value::Array(items) => match last.parse::<usize>() {
                Ok(index) if index < items.len() => {
                    items[index] = value;
                    Ok(())
                }
                _ => Err(self.not_a_container(last)),
            },
            _ => Err(self.not_a_container(last)),
        }
    }

    fn descend_or_create<'a>(
        &self,
        current: &'a mut Value,
        segment: &str,
    ) -> Result<&'a mut Value, PathError> {
        match current {
            Value::Object(map) => {
                let next = map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if next.is_object() || next.is_array() {
                    Ok(next)
                } else {
                    Err(self.not_a_container(segment))
                }
            }
            Value::Array(items) => {
                let index = segment
                    .parse::<usize>()
                    .map_err(|_| self.not_a_container(segment))?;
                match items.get_mut(index) {
                    Some(next) if next.is_object() || next.is_array() => Ok(next),
                    _ => Err(self.not_a_container(segment)),
                }
            }
            _ => Err(self.not_a_container(segment)),
        }
    }

    fn not_a_container(&self, segment: &str) -> PathError {
        PathError::NotAContainer {
            path: self.to_string(),
            segment: segment.to_string(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Resolves `path` in `document`. Malformed paths and missing data both yield `None`.
pub fn resolve<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    FieldPath::parse(path).ok()?.resolve(document)
}

/// Writes `value` at `path` in `document`, auto-vivifying intermediate objects.
pub fn assign(document: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    FieldPath::parse(path)?.assign(document, value)
}
