//! URL and host patterns
//!
//! Patterns are regular expressions in which named capture groups stand for
//! path parameters, e.g. `/comments/(?P<uid>\d+)`. Besides matching, a
//! [`UrlPattern`] can run backwards: given values for its groups it
//! produces the path they came from.

use crate::core::error::PatternError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Group,
}

/// A compiled URL path pattern
///
/// # Example
///
/// ```rust
/// use hypermedia::server::UrlPattern;
///
/// let pattern = UrlPattern::new(r"/(?P<uid>\d+)/siblings/(?P<relation>\w+)").unwrap();
///
/// assert!(pattern.is_match("/42/siblings/sister"));
/// assert_eq!(pattern.named_groups(), vec![("uid", 1), ("relation", 2)]);
/// assert_eq!(
///     pattern.reverse(&[Some("42"), Some("sister")]).unwrap(),
///     "/42/siblings/sister"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    regex: Regex,
    template: Option<Vec<Segment>>,
}

impl UrlPattern {
    /// Compile `pattern`, appending a `$` anchor when it has none
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let source = if pattern.ends_with('$') {
            pattern.to_string()
        } else {
            format!("{pattern}$")
        };
        let regex = compile(&source)?;
        let template = parse_template(&source, regex.captures_len() - 1);

        Ok(Self {
            source,
            regex,
            template,
        })
    }

    /// The pattern source, including the end anchor
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of capture groups, named or not
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Named capture groups with their 1-based position
    pub fn named_groups(&self) -> Vec<(&str, usize)> {
        self.regex
            .capture_names()
            .enumerate()
            .skip(1)
            .filter_map(|(index, name)| name.map(|name| (name, index)))
            .collect()
    }

    /// Whether `path` matches from its start to its end
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Whether [`UrlPattern::reverse`] can build paths from this pattern
    pub fn is_reversible(&self) -> bool {
        self.template.is_some()
    }

    /// Build a path from positional group values
    ///
    /// `args` holds one entry per capture group. Values are percent-encoded
    /// with `/` left intact.
    pub fn reverse<S: AsRef<str>>(&self, args: &[Option<S>]) -> Result<String, PatternError> {
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| PatternError::NotReversible {
                pattern: self.source.clone(),
            })?;

        if args.len() != self.group_count() {
            return Err(PatternError::ArgumentCount {
                pattern: self.source.clone(),
                expected: self.group_count(),
                actual: args.len(),
            });
        }

        let mut path = String::new();
        let mut values = args.iter().enumerate();
        for segment in template {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Group => {
                    let (index, value) = values.next().ok_or_else(|| PatternError::NotReversible {
                        pattern: self.source.clone(),
                    })?;
                    let value = value.as_ref().ok_or_else(|| PatternError::MissingArgument {
                        pattern: self.source.clone(),
                        index: index + 1,
                    })?;
                    push_escaped(&mut path, value.as_ref());
                }
            }
        }
        Ok(path)
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A virtual host pattern, matched against the whole request host
#[derive(Debug, Clone)]
pub struct HostPattern {
    source: String,
    regex: Regex,
}

/// Source of the host pattern that matches every host
pub const ANY_HOST: &str = ".*$";

static ANY_HOST_PATTERN: LazyLock<HostPattern> =
    LazyLock::new(|| HostPattern::new(ANY_HOST).expect("catch-all host pattern compiles"));

impl HostPattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let source = if pattern.ends_with('$') {
            pattern.to_string()
        } else {
            format!("{pattern}$")
        };
        let regex = compile(&source)?;
        Ok(Self { source, regex })
    }

    /// The catch-all pattern
    pub fn any() -> Self {
        ANY_HOST_PATTERN.clone()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_catch_all(&self) -> bool {
        self.source == ANY_HOST
    }

    /// Whether `host` (which may include a port) matches
    pub fn matches(&self, host: &str) -> bool {
        self.regex.is_match(host)
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compile with an implicit start anchor
fn compile(source: &str) -> Result<Regex, PatternError> {
    Regex::new(&format!("^(?:{source})")).map_err(|e| PatternError::InvalidRegex {
        pattern: source.to_string(),
        message: e.to_string(),
    })
}

/// Split a pattern into literal text and group slots
///
/// Only flat patterns are supported: every `(` must open a capture group,
/// groups must not nest, and literal text may contain escaped characters
/// but no escape classes such as `\d`. Anything else yields `None`.
fn parse_template(source: &str, groups: usize) -> Option<Vec<Segment>> {
    let body = source.strip_prefix('^').unwrap_or(source);
    let body = body.strip_suffix('$').unwrap_or(body);

    if body.matches('(').count() != groups {
        return None;
    }

    let mut segments = Vec::new();
    let mut fragments = body.split('(');

    if let Some(head) = fragments.next() {
        push_literal(&mut segments, head)?;
    }
    for fragment in fragments {
        let close = fragment.find(')')?;
        segments.push(Segment::Group);
        push_literal(&mut segments, &fragment[close + 1..])?;
    }
    Some(segments)
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) -> Option<()> {
    let literal = unescape(text)?;
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Some(())
}

/// Characters that make literal text something other than itself
const METACHARACTERS: &[char] = &['?', '*', '+', '.', '|', '[', ']', '{', '}', '^', '$', ')'];

/// Remove regex escapes from literal text
///
/// Fails on escape classes and on unescaped metacharacters, so optional
/// groups and patterns such as a trailing `/?` are not reversible.
fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) if !escaped.is_ascii_alphanumeric() => out.push(escaped),
                _ => return None,
            },
            c if METACHARACTERS.contains(&c) => return None,
            _ => out.push(c),
        }
    }
    Some(out)
}

/// Percent-encode a path value, keeping unreserved characters and `/`
fn push_escaped(out: &mut String, value: &str) {
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_anchor_is_appended() {
        let pattern = UrlPattern::new(r"/comments/(?P<uid>\d+)").unwrap();
        assert_eq!(pattern.as_str(), r"/comments/(?P<uid>\d+)$");
        assert!(pattern.is_match("/comments/12"));
        assert!(!pattern.is_match("/comments/12/extra"));
        assert!(!pattern.is_match("/prefix/comments/12"));
    }

    #[test]
    fn test_named_groups_in_order() {
        let pattern = UrlPattern::new(r"/(?P<uid>\d+)/siblings/(?P<relation>\w+)").unwrap();
        assert_eq!(pattern.group_count(), 2);
        assert_eq!(pattern.named_groups(), vec![("uid", 1), ("relation", 2)]);
    }

    #[test]
    fn test_reverse_substitutes_groups() {
        let pattern = UrlPattern::new(r"/movie/(?P<uid>\d+)").unwrap();
        assert_eq!(pattern.reverse(&[Some("1")]).unwrap(), "/movie/1");
    }

    #[test]
    fn test_reverse_unescapes_literals() {
        let pattern = UrlPattern::new(r"/files/(?P<name>[^/]+)\.json").unwrap();
        assert_eq!(pattern.reverse(&[Some("report")]).unwrap(), "/files/report.json");
    }

    #[test]
    fn test_reverse_escapes_values() {
        let pattern = UrlPattern::new(r"/search/(?P<term>.+)").unwrap();
        assert_eq!(
            pattern.reverse(&[Some("a b/c?")]).unwrap(),
            "/search/a%20b/c%3F"
        );
    }

    #[test]
    fn test_reverse_without_groups() {
        let pattern = UrlPattern::new("/search").unwrap();
        assert_eq!(pattern.reverse::<&str>(&[]).unwrap(), "/search");
    }

    #[test]
    fn test_reverse_argument_count() {
        let pattern = UrlPattern::new(r"/movie/(?P<uid>\d+)").unwrap();
        let err = pattern.reverse::<&str>(&[]).unwrap_err();
        assert!(matches!(
            err,
            PatternError::ArgumentCount {
                expected: 1,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_reverse_missing_argument() {
        let pattern = UrlPattern::new(r"/(\d+)/(?P<uid>\d+)").unwrap();
        let err = pattern.reverse(&[None, Some("2")]).unwrap_err();
        assert!(matches!(err, PatternError::MissingArgument { index: 1, .. }));
    }

    #[test]
    fn test_complex_patterns_are_not_reversible() {
        for source in [
            r"/a(?:b|c)",
            r"/a/(?P<x>(\d)+)",
            r"/a/\d+",
            r"/movie/(?P<uid>\d+)/?",
            r"/movie/(?P<uid>\d+)?",
            r"/movie/(?P<uid>\d+)+",
            r"/files/(?P<name>\w+).json",
            r"/a|/b",
        ] {
            let pattern = UrlPattern::new(source).unwrap();
            assert!(!pattern.is_reversible(), "{source} should not reverse");
        }
    }

    #[test]
    fn test_trailing_optional_slash_fails_to_reverse() {
        let pattern = UrlPattern::new(r"/movie/(?P<uid>\d+)/?").unwrap();
        assert!(pattern.is_match("/movie/1/"));
        assert!(pattern.is_match("/movie/1"));

        let err = pattern.reverse(&[Some("1")]).unwrap_err();
        assert!(matches!(err, PatternError::NotReversible { .. }));
    }

    #[test]
    fn test_invalid_regex() {
        let err = UrlPattern::new("/(unclosed").unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
    }

    #[test]
    fn test_host_pattern_matches_whole_host() {
        let host = HostPattern::new(r"65\.199\.32\.155").unwrap();
        assert!(host.matches("65.199.32.155"));
        assert!(!host.matches("65.199.32.155:8080"));
        assert!(!host.matches("10.0.0.1"));
        assert!(!host.is_catch_all());
    }

    #[test]
    fn test_any_host() {
        let host = HostPattern::any();
        assert!(host.is_catch_all());
        assert!(host.matches("10.0.0.1:8080"));
        assert!(HostPattern::new(".*").unwrap().is_catch_all());
    }

    #[test]
    fn test_any_host_matches_compiled_catch_all() {
        let compiled = HostPattern::new(ANY_HOST).unwrap();
        let any = HostPattern::any();

        assert_eq!(any.as_str(), compiled.as_str());
        assert_eq!(any.regex.as_str(), compiled.regex.as_str());
        for host in ["", "example.com", "65.199.32.155:8080"] {
            assert!(any.matches(host));
        }
    }
}
