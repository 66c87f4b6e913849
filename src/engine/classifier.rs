use super::ruleset::{normalize_number, Classification, RuleSet};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

/// Hot-path handle on the currently active rule set.
///
/// Every call loads one snapshot and evaluates both lists against it, so a
/// concurrent [`install`](Classifier::install) can never mix the ham list of
/// one generation with the spam list of another.
pub struct Classifier {
    rules: ArcSwap<RuleSet>,
}

impl Classifier {
    pub fn new(initial: RuleSet) -> Arc<Self> {
        Arc::new(Self {
            rules: ArcSwap::from_pointee(initial),
        })
    }

    /// Rates the provided number as spam, ham, or unknown.
    ///
    /// The input is reduced to its digits first; an input without digits
    /// matches nothing and comes back as unknown.
    pub fn classify(&self, raw_number: &str) -> Classification {
        let number = normalize_number(raw_number);
        self.rules.load().classify(&number)
    }

    /// Current raw pattern lines grouped under their section markers.
    pub fn list_patterns(&self) -> Vec<String> {
        self.rules.load().display_lines()
    }

    /// Atomically replaces the active rule set.
    pub fn install(&self, rules: RuleSet) {
        info!(
            "Installing rule set with {} spam and {} ham patterns",
            rules.spam_count(),
            rules.ham_count()
        );
        self.rules.store(Arc::new(rules));
    }
}
