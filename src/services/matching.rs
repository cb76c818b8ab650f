use std::sync::Arc;

use crate::core::{MatchError, MatchResult, Matcher};
use crate::interpreter::QueryInterpreter;
use crate::models::MatchCriteria;
use crate::services::catalog::CandidateSource;

/// Outcome of a free-text match: the criteria understood plus the matches
#[derive(Debug)]
pub struct TextMatchResult {
    pub criteria: MatchCriteria,
    pub result: MatchResult,
}

/// Entry point for matching: reads candidates, interprets text, runs the
/// matcher
///
/// Holds no per-request state, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct MatchService {
    catalog: Arc<dyn CandidateSource>,
    interpreter: Arc<dyn QueryInterpreter>,
    matcher: Matcher,
}

impl MatchService {
    pub fn new(
        catalog: Arc<dyn CandidateSource>,
        interpreter: Arc<dyn QueryInterpreter>,
        matcher: Matcher,
    ) -> Self {
        Self {
            catalog,
            interpreter,
            matcher,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn CandidateSource> {
        &self.catalog
    }

    pub fn interpreter(&self) -> &Arc<dyn QueryInterpreter> {
        &self.interpreter
    }

    /// Match structured criteria against the full catalog
    pub async fn match_criteria(&self, criteria: &MatchCriteria) -> Result<MatchResult, MatchError> {
        let candidates = self.catalog.fetch_candidates().await.map_err(|e| {
            tracing::error!("Failed to read vendor candidates from {}: {}", self.catalog.backend(), e);
            MatchError::StorageUnavailable(e.to_string())
        })?;

        let result = self.matcher.find_matches(criteria, candidates)?;

        tracing::info!(
            "Matched {} vendors (from {} candidates)",
            result.matches.len(),
            result.total_candidates
        );

        Ok(result)
    }

    /// Interpret free text, then match the resulting criteria
    pub async fn match_text(&self, text: &str) -> Result<TextMatchResult, MatchError> {
        let criteria = self.interpreter.interpret(text).await;

        tracing::debug!(
            "Interpreted query with {} strategy: {:?}",
            self.interpreter.strategy(),
            criteria
        );

        let result = self.match_criteria(&criteria).await?;

        Ok(TextMatchResult { criteria, result })
    }
}
