mod classifier;
mod pattern;
mod reload;
mod ruleset;
mod source;

pub use classifier::Classifier;
pub use pattern::CompiledPattern;
pub use reload::ReloadWatcher;
pub use ruleset::{normalize_number, Classification, RuleSet};
pub use source::{FilePatternSource, PatternSource};
