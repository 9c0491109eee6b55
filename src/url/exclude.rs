//! Exclusion filter for skipping URLs during a check run
//!
//! Each configured pattern is first compiled as a case-insensitive regular
//! expression. Patterns that are not valid expressions fall back to a
//! case-insensitive substring match.

use regex::{Regex, RegexBuilder};

/// A single compiled exclusion pattern
#[derive(Debug, Clone)]
pub enum ExclusionRule {
    /// Pattern compiled as a case-insensitive regular expression
    Pattern(Regex),

    /// Pattern that failed to compile, matched as a lowercase substring
    Substring(String),
}

impl ExclusionRule {
    /// Compiles a raw pattern, falling back to substring matching
    pub fn compile(raw: &str) -> Self {
        match RegexBuilder::new(raw).case_insensitive(true).build() {
            Ok(regex) => Self::Pattern(regex),
            Err(e) => {
                tracing::warn!(
                    "Exclusion pattern {:?} is not a valid regex ({}), using substring match",
                    raw,
                    e
                );
                Self::Substring(raw.to_lowercase())
            }
        }
    }

    /// Returns true if the URL matches this rule
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Pattern(regex) => regex.is_match(url),
            Self::Substring(needle) => url.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Ordered list of exclusion rules
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    rules: Vec<ExclusionRule>,
}

impl ExclusionFilter {
    /// Builds a filter from raw pattern strings
    ///
    /// # Examples
    ///
    /// ```
    /// use deadlink_checker::url::ExclusionFilter;
    ///
    /// let filter = ExclusionFilter::new(["/private/", r"\.pdf$", "[unclosed"]);
    /// assert!(filter.is_excluded("https://example.com/PRIVATE/x"));
    /// assert!(filter.is_excluded("https://example.com/doc.PDF"));
    /// assert!(filter.is_excluded("https://example.com/[unclosed"));
    /// assert!(!filter.is_excluded("https://example.com/public"));
    /// ```
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| ExclusionRule::compile(p.as_ref()))
            .collect();

        Self { rules }
    }

    /// Returns true if any rule matches the URL
    pub fn is_excluded(&self, url: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(url))
    }

    /// Returns true if the filter has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the number of rules in the filter
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
