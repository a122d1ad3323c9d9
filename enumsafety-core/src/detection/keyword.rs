//! Keyword matching for comment- and name-based detection.
//!
//! Patterns are compiled once per run. Matching is case-insensitive and the
//! keyword must be followed by end of text or a space, so `enumerable` never
//! matches `enum`.

use regex::Regex;
use tracing::warn;

/// Keyword used when none (or a blank one) is configured.
pub const DEFAULT_KEYWORD: &str = "enum";

/// Compiled keyword patterns for one run.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
    /// `^keyword( |$)`
    marker: Option<Regex>,
}

impl KeywordMatcher {
    /// Compile patterns for `keyword`. A blank keyword falls back to
    /// [`DEFAULT_KEYWORD`].
    pub fn new(keyword: &str) -> Self {
        let trimmed = keyword.trim();
        let keyword = if trimmed.is_empty() {
            warn!(
                fallback = DEFAULT_KEYWORD,
                "blank detection keyword, falling back to default"
            );
            DEFAULT_KEYWORD.to_string()
        } else {
            trimmed.to_string()
        };
        let marker = compile(&format!("^{}( |$)", regex::escape(&keyword)));
        Self { keyword, marker }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// `Statusenum`, `StatusEnum`, `STATUS_ENUM`
    pub fn is_suffix_of(&self, name: &str) -> bool {
        name.to_lowercase().ends_with(&self.keyword.to_lowercase())
    }

    /// Comment line (markers stripped) equals the keyword or starts with
    /// `<keyword> `.
    pub fn marks(&self, line: &str) -> bool {
        self.marker
            .as_ref()
            .is_some_and(|re| re.is_match(line.trim()))
    }

    /// Comment line starts with `<type_name> <keyword>` followed by end of
    /// text or a space.
    pub fn names(&self, line: &str, type_name: &str) -> bool {
        let pattern = format!(
            "^{} {}( |$)",
            regex::escape(type_name),
            regex::escape(&self.keyword)
        );
        compile(&pattern).is_some_and(|re| re.is_match(line.trim()))
    }
}

/// Build a case-insensitive regex. A rejected pattern matches nothing.
fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("(?i){}", pattern)) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "keyword pattern rejected");
            None
        }
    }
}
