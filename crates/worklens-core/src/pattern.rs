//! Glob exclusion compilation.
//!
//! Supports `*`, `**`, `?` and `{a,b,c}`. All patterns of a rule set are
//! translated into a single anchored, case-insensitive regex so each
//! candidate path is tested once, not once per pattern. Compiled matchers
//! are cached by pattern text, so scans with unchanged configuration never
//! recompile.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

use regex::{Regex, RegexBuilder};

static REGEX_CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();

fn cache_lookup(key: &str, build: impl FnOnce() -> Option<Regex>) -> Option<Regex> {
    let cache = REGEX_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(regex) = cache.get(key) {
        return Some(regex.clone());
    }
    let regex = build()?;
    cache.insert(key.to_string(), regex.clone());
    Some(regex)
}

/// An ordered set of exclusion globs compiled into one reusable matcher.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    regex: Option<Regex>,
    skip_names: HashSet<String>,
}

impl ExclusionSet {
    /// Compile a rule set. Never fails: malformed fragments degrade to
    /// escaped literals.
    pub fn compile(patterns: &[String]) -> Self {
        let skip_names = fast_skip_names(patterns);

        if patterns.is_empty() {
            return Self {
                regex: None,
                skip_names,
            };
        }

        let parts: Vec<String> = patterns
            .iter()
            .map(|p| glob_to_regex_fragment(&normalize_separators(p)))
            .collect();
        let combined = format!("(?:{})", parts.join("|"));

        let regex = cache_lookup(&combined, || {
            let built = RegexBuilder::new(&combined).case_insensitive(true).build();
            match built {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::warn!(%err, "exclusion rule set failed to compile; matching nothing");
                    None
                }
            }
        });

        Self { regex, skip_names }
    }

    /// Test a full path against the compiled matcher.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(regex) = &self.regex else {
            return false;
        };
        regex.is_match(&normalize_separators(&path.to_string_lossy()))
    }

    /// Test a bare directory name against the fast-skip set derived from
    /// simple `**/<name>/**` patterns. O(1), consulted before the regex.
    pub fn is_fast_skip(&self, name: &str) -> bool {
        self.skip_names.contains(name)
    }
}

/// Match one path against one glob pattern.
pub fn glob_matches(path: &str, pattern: &str) -> bool {
    let fragment = glob_to_regex_fragment(&normalize_separators(pattern));
    let Some(regex) = cache_lookup(&fragment, || {
        RegexBuilder::new(&fragment).case_insensitive(true).build().ok()
    }) else {
        return false;
    };
    regex.is_match(&normalize_separators(path))
}

/// Extract bare directory names from patterns shaped exactly like
/// `**/node_modules/**`, for cheap basename rejection during scans.
fn fast_skip_names(patterns: &[String]) -> HashSet<String> {
    let mut names = HashSet::new();
    for pattern in patterns {
        let Some(inner) = pattern
            .strip_prefix("**/")
            .and_then(|rest| rest.strip_suffix("/**"))
        else {
            continue;
        };
        if !inner.is_empty()
            && inner
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            names.insert(inner.to_string());
        }
    }
    names
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Translate one glob into an anchored regex fragment.
///
/// `**/` spans zero or more leading segments, bare `**` crosses
/// separators, `*` and `?` stay within a segment, `{a,b}` alternates
/// escaped literals. An unterminated `{` is escaped rather than rejected.
fn glob_to_regex_fragment(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut regex = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    if chars.get(i + 2) == Some(&'/') {
                        regex.push_str("(?:.*/)?");
                        i += 3;
                    } else {
                        regex.push_str(".*");
                        i += 2;
                    }
                } else {
                    regex.push_str("[^/]*");
                    i += 1;
                }
            }
            '?' => {
                regex.push_str("[^/]");
                i += 1;
            }
            '{' => match chars[i + 1..].iter().position(|&c| c == '}') {
                Some(offset) => {
                    let end = i + 1 + offset;
                    let body: String = chars[i + 1..end].iter().collect();
                    let alternatives: Vec<String> =
                        body.split(',').map(regex::escape).collect();
                    regex.push_str("(?:");
                    regex.push_str(&alternatives.join("|"));
                    regex.push(')');
                    i = end + 1;
                }
                None => {
                    regex.push_str(&regex::escape("{"));
                    i += 1;
                }
            },
            c => {
                regex.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    regex.push('$');
    regex
}
