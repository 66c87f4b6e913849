use super::pattern::CompiledPattern;
use std::fmt;
use tracing::debug;

const SPAM_SECTION_MARKER: &str = "[spam]";
const HAM_SECTION_MARKER: &str = "[ham]";

/// How do we classify a given number?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Should be blocked.
    Spam,
    /// Can be trusted.
    Ham,
    /// Could not be matched to either list.
    Unknown,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Spam => "SPAM",
            Classification::Ham => "HAM",
            Classification::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable snapshot of the pattern file.
///
/// Keeps the raw trimmed lines for display next to the compiled matchers,
/// split into the spam and ham sections. Built once per reload cycle and
/// never mutated afterwards.
#[derive(Debug, Default)]
pub struct RuleSet {
    spam_raw: Vec<String>,
    spam: Vec<CompiledPattern>,
    ham_raw: Vec<String>,
    ham: Vec<CompiledPattern>,
}

impl RuleSet {
    /// Parses pattern lines into a new rule set.
    ///
    /// Lines before the first section marker count as spam. The last seen
    /// marker governs subsequent lines until the next marker. Blank lines,
    /// comments and lines that normalize to nothing are skipped.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = RuleSet::default();
        let mut spam_section = true;

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with(SPAM_SECTION_MARKER) {
                spam_section = true;
                continue;
            }

            if line.starts_with(HAM_SECTION_MARKER) {
                spam_section = false;
                continue;
            }

            let Some(compiled) = CompiledPattern::compile(line) else {
                debug!("Skipping pattern line without usable characters: {line}");
                continue;
            };

            debug!(
                "Ingesting {} pattern: {line}",
                if spam_section { "spam" } else { "ham" }
            );

            if spam_section {
                rules.spam_raw.push(line.to_string());
                rules.spam.push(compiled);
            } else {
                rules.ham_raw.push(line.to_string());
                rules.ham.push(compiled);
            }
        }

        rules
    }

    /// Classifies an already-normalized, digits-only number.
    ///
    /// Ham patterns win over spam patterns when both match.
    pub fn classify(&self, number: &str) -> Classification {
        if self.ham.iter().any(|p| p.matches(number)) {
            Classification::Ham
        } else if self.spam.iter().any(|p| p.matches(number)) {
            Classification::Spam
        } else {
            Classification::Unknown
        }
    }

    /// Raw pattern lines grouped under their section markers, in file order.
    /// Empty sections are omitted.
    pub fn display_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.spam_raw.len() + self.ham_raw.len() + 2);
        if !self.spam_raw.is_empty() {
            lines.push(SPAM_SECTION_MARKER.to_string());
            lines.extend(self.spam_raw.iter().cloned());
        }
        if !self.ham_raw.is_empty() {
            lines.push(HAM_SECTION_MARKER.to_string());
            lines.extend(self.ham_raw.iter().cloned());
        }
        lines
    }

    pub fn spam_count(&self) -> usize {
        self.spam.len()
    }

    pub fn ham_count(&self) -> usize {
        self.ham.len()
    }
}

/// Strips everything which is not a digit from a number under test.
///
/// Stricter than pattern normalization: wildcard characters carry no meaning
/// in an input.
pub fn normalize_number(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
