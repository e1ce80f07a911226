//! Ordered fallback across log sources.

use crate::source::LogSource;
use crate::types::{Attempt, RetrievalResult};

/// Result of running the chain once.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    /// Lines from the first non-empty source, or a `none` result.
    pub result: RetrievalResult,
    /// Sources tried before `result`, with the reason each was skipped.
    pub attempts: Vec<Attempt>,
}

impl ChainOutcome {
    pub fn is_exhausted(&self) -> bool {
        self.result.is_empty()
    }
}

/// Tries sources strictly in order, one at a time.
///
/// The first source that yields at least one line wins and no later source
/// is touched. Errors and empty results are both skips. Nothing is merged
/// across sources and nothing is retried.
#[derive(Default)]
pub struct FallbackChain {
    sources: Vec<Box<dyn LogSource>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower priority than all existing ones.
    pub fn with_source(mut self, source: impl LogSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub async fn retrieve(&self, count: usize) -> ChainOutcome {
        let mut attempts = Vec::new();

        for source in &self.sources {
            let id = source.id();
            match source.fetch(count).await {
                Ok(mut result) if !result.is_empty() => {
                    if result.lines.len() > count {
                        let excess = result.lines.len() - count;
                        result.lines.drain(..excess);
                    }
                    tracing::info!(
                        source = %result.source,
                        path = %result.path,
                        lines = result.lines.len(),
                        truncated = result.truncated,
                        skipped = attempts.len(),
                        "logs retrieved"
                    );
                    return ChainOutcome { result, attempts };
                }
                Ok(result) => {
                    tracing::debug!(source = %id, path = %result.path, "source returned no lines");
                    attempts.push(Attempt {
                        source: id,
                        reason: "no lines".into(),
                    });
                }
                Err(e) => {
                    tracing::debug!(source = %id, error = %e, "source unavailable");
                    attempts.push(Attempt {
                        source: id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::warn!(tried = attempts.len(), "no log source produced any lines");
        ChainOutcome {
            result: RetrievalResult::none(),
            attempts,
        }
    }
}
