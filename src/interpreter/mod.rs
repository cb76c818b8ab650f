// Natural-language query interpretation
pub mod model;
pub mod rules;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::InterpreterSettings;
use crate::models::MatchCriteria;
use crate::services::llm::ChatCompletionClient;

pub use model::ModelBackedInterpreter;
pub use rules::RuleBasedInterpreter;

/// Turns free text into match criteria
///
/// Interpretation never fails: a strategy that cannot reach its backend
/// degrades to rule-based parsing.
#[async_trait]
pub trait QueryInterpreter: Send + Sync {
    async fn interpret(&self, text: &str) -> MatchCriteria;

    /// Short name of the strategy, reported by the health endpoint
    fn strategy(&self) -> &'static str;
}

#[async_trait]
impl QueryInterpreter for RuleBasedInterpreter {
    async fn interpret(&self, text: &str) -> MatchCriteria {
        self.parse(text)
    }

    fn strategy(&self) -> &'static str {
        "rules"
    }
}

/// Select the interpretation strategy once, at startup
///
/// The model-backed strategy needs provider `openai` and a non-empty API key;
/// anything else gets the rule-based interpreter.
pub fn build_interpreter(settings: &InterpreterSettings) -> Arc<dyn QueryInterpreter> {
    let api_key = settings.api_key.trim();

    if !settings.provider.eq_ignore_ascii_case("openai") || api_key.is_empty() {
        tracing::info!("Using rule-based query interpreter");
        return Arc::new(RuleBasedInterpreter::new());
    }

    let timeout = Duration::from_secs(settings.timeout_secs);

    match ChatCompletionClient::new(
        settings.base_url.clone(),
        api_key.to_string(),
        settings.model.clone(),
        timeout,
    ) {
        Ok(client) => {
            tracing::info!("Using model-backed query interpreter ({})", client.model());
            Arc::new(ModelBackedInterpreter::new(client, timeout))
        }
        Err(e) => {
            tracing::error!("Failed to create model client, using rule-based interpreter: {}", e);
            Arc::new(RuleBasedInterpreter::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str, api_key: &str) -> InterpreterSettings {
        InterpreterSettings {
            provider: provider.to_string(),
            api_key: api_key.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_factory_selects_strategy() {
        assert_eq!(build_interpreter(&settings("openai", "sk-test")).strategy(), "model");
        assert_eq!(build_interpreter(&settings("OpenAI", "sk-test")).strategy(), "model");
        assert_eq!(build_interpreter(&settings("openai", "  ")).strategy(), "rules");
        assert_eq!(build_interpreter(&settings("mock", "sk-test")).strategy(), "rules");
        assert_eq!(build_interpreter(&settings("", "")).strategy(), "rules");
    }

    #[test]
    fn test_rule_based_strategy_is_deterministic() {
        let interpreter = build_interpreter(&InterpreterSettings::default());
        let text = "SOC 2 colocation in Chicago";

        let first = tokio_test::block_on(interpreter.interpret(text));
        let second = tokio_test::block_on(interpreter.interpret(text));

        assert_eq!(first, second);
        assert_eq!(first.cities, vec!["Chicago"]);
    }
}
