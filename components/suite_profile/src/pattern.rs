//! Glob include patterns
//!
//! Patterns are matched against project-relative paths that use `/` as the
//! separator on every platform. Supported syntax:
//!
//! - `**/` matches zero or more whole directories
//! - `*` matches any run of characters within one path segment
//! - `?` matches a single character within one path segment
//!
//! Everything else is matched literally.

use crate::error::{ProfileError, ProfileResult};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Compiled glob used to select test files
#[derive(Debug, Clone)]
pub struct IncludePattern {
    glob: String,
    regex: Regex,
}

impl IncludePattern {
    /// Compile a project-relative glob
    pub fn new(glob: &str) -> ProfileResult<Self> {
        let invalid = |reason: &str| ProfileError::InvalidPattern {
            pattern: glob.to_string(),
            reason: reason.to_string(),
        };

        if glob.trim().is_empty() {
            return Err(invalid("pattern is empty"));
        }
        if glob.starts_with('/') || glob.split('/').any(|segment| segment == "..") {
            return Err(invalid("pattern must be project-relative"));
        }

        let regex = Regex::new(&glob_to_regex(glob)).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    /// The glob this pattern was compiled from
    pub fn as_str(&self) -> &str {
        &self.glob
    }

    /// Check a `/`-separated project-relative path
    pub fn matches(&self, relative: &str) -> bool {
        self.regex.is_match(relative)
    }

    /// Check a project-relative filesystem path
    ///
    /// Paths that are absolute, escape the project, or are not valid UTF-8
    /// never match.
    pub fn matches_path(&self, relative: &Path) -> bool {
        to_slash_path(relative)
            .map(|p| self.matches(&p))
            .unwrap_or(false)
    }

    /// Directory holding every file this pattern can match
    ///
    /// This is the literal prefix of the glob, e.g. `tests/unit` for
    /// `tests/unit/**/*.test.*`. Discovery walks only this directory.
    pub fn base_dir(&self) -> PathBuf {
        let segments: Vec<&str> = self.glob.split('/').collect();
        let mut base = PathBuf::new();

        for segment in &segments[..segments.len().saturating_sub(1)] {
            if is_wildcard(segment) {
                break;
            }
            if !segment.is_empty() && *segment != "." {
                base.push(segment);
            }
        }

        base
    }
}

impl PartialEq for IncludePattern {
    fn eq(&self, other: &Self) -> bool {
        self.glob == other.glob
    }
}

impl Eq for IncludePattern {}

impl fmt::Display for IncludePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob)
    }
}

impl Serialize for IncludePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.glob)
    }
}

fn is_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?'])
}

/// Translate a glob into an anchored regular expression
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:[^/]+/)*");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            c => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Render a relative path with `/` separators
fn to_slash_path(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.join("/"))
}
