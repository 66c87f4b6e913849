use super::classifier::Classifier;
use super::ruleset::RuleSet;
use super::source::PatternSource;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Keeps the active rule set in sync with the pattern source.
///
/// Polls the source's modification marker on a fixed interval and swaps in a
/// freshly parsed rule set when it changes. A reload that fails leaves the
/// previously installed rule set and the previously observed marker in
/// place, so the next tick retries.
pub struct ReloadWatcher {
    classifier: Arc<Classifier>,
    source: Arc<dyn PatternSource>,
    interval: Duration,
}

impl ReloadWatcher {
    pub fn new(
        classifier: Arc<Classifier>,
        source: Arc<dyn PatternSource>,
        interval: Duration,
    ) -> Self {
        Self {
            classifier,
            source,
            interval,
        }
    }

    /// Reads the source once and installs the result.
    ///
    /// Returns `false` on an unreadable source; the classifier then keeps
    /// whatever rule set it already has.
    pub async fn load_once(&self) -> bool {
        match self.source.read_lines().await {
            Ok(lines) => {
                self.classifier.install(RuleSet::parse(lines));
                true
            }
            Err(e) => {
                error!(
                    "Pattern source '{}' could not be read: {:#}",
                    self.source.describe(),
                    e
                );
                false
            }
        }
    }

    /// Background polling loop. Runs until `cancel` fires.
    ///
    /// If the modification marker cannot be read at startup (typically a
    /// missing file), live reload is disabled and the loop exits; the
    /// service keeps serving with whatever was loaded before.
    pub async fn run(self, cancel: CancellationToken) {
        let mut last_modified: SystemTime = match self.source.modified().await {
            Ok(modified) => modified,
            Err(e) => {
                error!(
                    "Unable to watch pattern source '{}', live reload disabled: {:#}",
                    self.source.describe(),
                    e
                );
                return;
            }
        };

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Reload watcher stopped");
                    return;
                }
                _ = ticker.tick() => {}
            }

            match self.source.modified().await {
                Ok(modified) if modified != last_modified => {
                    info!(
                        "Change in pattern source '{}' detected, reloading",
                        self.source.describe()
                    );
                    if self.load_once().await {
                        last_modified = modified;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Pattern source check failed: {:#}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Classification;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Source backed by an in-memory list, switchable to a failing state.
    struct StaticSource {
        lines: Mutex<Option<Vec<String>>>,
    }

    impl StaticSource {
        fn with_lines(lines: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                lines: Mutex::new(Some(lines.iter().map(|s| s.to_string()).collect())),
            })
        }

        fn fail(&self) {
            *self.lines.lock().unwrap() = None;
        }
    }

    #[async_trait]
    impl PatternSource for StaticSource {
        async fn read_lines(&self) -> anyhow::Result<Vec<String>> {
            self.lines
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow!("source gone"))
        }

        async fn modified(&self) -> anyhow::Result<SystemTime> {
            Ok(SystemTime::UNIX_EPOCH)
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    #[tokio::test]
    async fn test_load_once_installs_parsed_rules() {
        let source = StaticSource::with_lines(&["[spam]", "123", "[ham]", "911"]);
        let classifier = Classifier::new(RuleSet::default());
        let watcher = ReloadWatcher::new(classifier.clone(), source, Duration::from_secs(5));

        assert!(watcher.load_once().await);
        assert_eq!(classifier.classify("123"), Classification::Spam);
        assert_eq!(classifier.classify("911"), Classification::Ham);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_rules() {
        let source = StaticSource::with_lines(&["[spam]", "123"]);
        let classifier = Classifier::new(RuleSet::default());
        let watcher =
            ReloadWatcher::new(classifier.clone(), source.clone(), Duration::from_secs(5));

        assert!(watcher.load_once().await);
        assert_eq!(classifier.classify("123"), Classification::Spam);

        source.fail();
        assert!(!watcher.load_once().await);
        assert_eq!(classifier.classify("123"), Classification::Spam);
        assert_eq!(classifier.list_patterns(), vec!["[spam]", "123"]);
    }

    #[tokio::test]
    async fn test_cancel_stops_the_loop() {
        let source = StaticSource::with_lines(&[]);
        let classifier = Classifier::new(RuleSet::default());
        let watcher = ReloadWatcher::new(classifier, source, Duration::from_secs(3600));

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(watcher.run(cancel.clone()));

        // The loop must exit out of a pending hour-long sleep.
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("watcher did not stop on cancellation")
            .unwrap();
    }
}
