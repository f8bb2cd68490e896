use std::sync::Arc;

use crate::constants::prompts;
use crate::services::evaluation::Mistake;
use crate::services::provider::TextGenerationProvider;

const SUGGESTION_MAX_TOKENS: u32 = 150;
const SUGGESTION_TEMPERATURE: f32 = 0.7;
const MAX_SUGGESTIONS: usize = 2;

/// Turns a mistake list into at most two improvement tips. Provider
/// failures fall back to deterministic tips immediately (no retry), so
/// callers never see an error from this component.
pub struct SuggestionGenerator {
    provider: Arc<dyn TextGenerationProvider>,
}

impl SuggestionGenerator {
    pub fn new(provider: Arc<dyn TextGenerationProvider>) -> Self {
        Self { provider }
    }

    pub async fn suggest(&self, mistakes: &[Mistake]) -> Vec<String> {
        if mistakes.is_empty() {
            return vec![
                "Great work! Keep practicing regularly to stay sharp.".to_string(),
                "Try a harder difficulty next time to keep challenging yourself.".to_string(),
            ];
        }

        let prompt = prompts::suggestions_prompt(mistakes);
        match self
            .provider
            .complete(&prompt, SUGGESTION_MAX_TOKENS, SUGGESTION_TEMPERATURE)
            .await
        {
            Ok(content) => {
                let tips: Vec<String> = content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .take(MAX_SUGGESTIONS)
                    .map(str::to_string)
                    .collect();

                if tips.is_empty() {
                    Self::fallback_tips(mistakes.len())
                } else {
                    tips
                }
            }
            Err(err) => {
                log::warn!("suggestion provider failed ({}), using fallback tips", err);
                Self::fallback_tips(mistakes.len())
            }
        }
    }

    fn fallback_tips(mistake_count: usize) -> Vec<String> {
        vec![
            format!(
                "Review the {} question{} you missed and redo them without a time limit.",
                mistake_count,
                if mistake_count == 1 { "" } else { "s" }
            ),
            "Practice estimating the answer first to catch calculation errors.".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::services::provider::MockTextGenerationProvider;

    fn mistake(text: &str) -> Mistake {
        Mistake {
            question_id: "q1".into(),
            text: text.into(),
            correct_option: "A".into(),
            user_response: "B".into(),
        }
    }

    #[tokio::test]
    async fn empty_mistakes_return_two_affirmations() {
        let mut provider = MockTextGenerationProvider::new();
        provider.expect_complete().never();
        let generator = SuggestionGenerator::new(Arc::new(provider));

        let tips = generator.suggest(&[]).await;
        assert_eq!(tips.len(), 2);
        assert!(tips.iter().all(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn provider_reply_is_split_into_at_most_two_lines() {
        let mut provider = MockTextGenerationProvider::new();
        provider.expect_complete().returning(|_, _, _| {
            Ok("1. Revise multiplication tables.\n\n2. Slow down on word problems.\n3. Extra tip.".to_string())
        });
        let generator = SuggestionGenerator::new(Arc::new(provider));

        let tips = generator.suggest(&[mistake("What is 6 x 7?")]).await;
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0], "1. Revise multiplication tables.");
        assert_eq!(tips[1], "2. Slow down on word problems.");
    }

    #[tokio::test]
    async fn single_line_reply_is_kept_as_is() {
        let mut provider = MockTextGenerationProvider::new();
        provider
            .expect_complete()
            .returning(|_, _, _| Ok("Focus on place value.".to_string()));
        let generator = SuggestionGenerator::new(Arc::new(provider));

        let tips = generator.suggest(&[mistake("Q")]).await;
        assert_eq!(tips, vec!["Focus on place value.".to_string()]);
    }

    #[tokio::test]
    async fn provider_failure_yields_deterministic_tips() {
        let mut provider = MockTextGenerationProvider::new();
        provider
            .expect_complete()
            .times(1)
            .returning(|_, _, _| Err(AppError::ProviderError("quota".to_string())));
        let generator = SuggestionGenerator::new(Arc::new(provider));

        let tips = generator
            .suggest(&[mistake("Q1"), mistake("Q2"), mistake("Q3")])
            .await;
        assert_eq!(tips.len(), 2);
        assert!(tips[0].contains('3'));
    }

    #[tokio::test]
    async fn whitespace_only_reply_falls_back() {
        let mut provider = MockTextGenerationProvider::new();
        provider
            .expect_complete()
            .returning(|_, _, _| Ok("   \n\n  ".to_string()));
        let generator = SuggestionGenerator::new(Arc::new(provider));

        let tips = generator.suggest(&[mistake("Q")]).await;
        assert_eq!(tips.len(), 2);
        assert!(tips.iter().all(|t| !t.is_empty()));
    }
}
