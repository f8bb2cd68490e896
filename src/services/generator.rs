use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::constants::prompts;
use crate::models::domain::{Difficulty, DifficultyDistribution, Question};
use crate::services::provider::TextGenerationProvider;

const OPTION_LABELS: [&str; 4] = ["A", "B", "C", "D"];
const GENERATION_MAX_TOKENS: u32 = 800;
const GENERATION_TEMPERATURE: f32 = 0.7;

/// Shape the provider is asked to return, one element per question.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    text: String,
    options: Vec<String>,
    correct_option: String,
    #[serde(default)]
    hint: String,
}

/// Produces question batches for a quiz. The primary path delegates to
/// the text-generation provider; any failure or unparsable reply routes
/// that batch to a deterministic arithmetic generator, so `generate`
/// itself can never fail for valid input.
pub struct QuestionGenerator {
    provider: Arc<dyn TextGenerationProvider>,
}

impl QuestionGenerator {
    pub fn new(provider: Arc<dyn TextGenerationProvider>) -> Self {
        Self { provider }
    }

    /// Generate questions matching the requested difficulty mix. One
    /// provider request is issued per non-empty tier; a failed batch is
    /// discarded whole and regenerated deterministically, never
    /// repaired element by element.
    pub async fn generate(
        &self,
        grade: i32,
        subject: &str,
        mix: DifficultyDistribution,
    ) -> Vec<Question> {
        let tiers = [
            (Difficulty::Easy, mix.easy),
            (Difficulty::Medium, mix.medium),
            (Difficulty::Hard, mix.hard),
        ];

        let mut questions = Vec::with_capacity(mix.total().max(0) as usize);
        for (difficulty, count) in tiers {
            if count <= 0 {
                continue;
            }
            questions.extend(self.generate_tier(grade, subject, count, difficulty).await);
        }
        questions
    }

    async fn generate_tier(
        &self,
        grade: i32,
        subject: &str,
        count: i32,
        difficulty: Difficulty,
    ) -> Vec<Question> {
        let prompt = prompts::question_batch_prompt(grade, subject, count, difficulty);

        match self
            .provider
            .complete(&prompt, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE)
            .await
        {
            Ok(content) => {
                match parse_question_batch(&content, count, difficulty, grade, subject) {
                    Some(batch) => batch,
                    None => {
                        log::warn!(
                            "discarding unparsable {} batch for grade {} {}, using deterministic generator",
                            difficulty,
                            grade,
                            subject
                        );
                        deterministic_batch(grade, subject, count, difficulty)
                    }
                }
            }
            Err(err) => {
                log::warn!(
                    "provider failed for {} batch ({}), using deterministic generator",
                    difficulty,
                    err
                );
                deterministic_batch(grade, subject, count, difficulty)
            }
        }
    }
}

/// Pull the first array-shaped substring out of a free-text reply and
/// validate it into questions. Returns `None` when the batch must be
/// discarded.
fn parse_question_batch(
    content: &str,
    expected_count: i32,
    difficulty: Difficulty,
    grade: i32,
    subject: &str,
) -> Option<Vec<Question>> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    if end <= start {
        return None;
    }

    let raw: Vec<RawQuestion> = serde_json::from_str(&content[start..=end]).ok()?;
    if raw.len() != expected_count as usize {
        return None;
    }

    let mut questions = Vec::with_capacity(raw.len());
    for item in raw {
        if item.text.trim().is_empty() || item.options.is_empty() {
            return None;
        }
        let correct = item.correct_option.trim();
        let labels_option = item
            .options
            .iter()
            .any(|option| Question::option_label(option) == correct || option == correct);
        if !labels_option {
            return None;
        }

        // Classification tags come from the request, not the provider
        questions.push(Question::new(
            item.text.trim(),
            item.options,
            correct,
            &item.hint,
            difficulty,
            grade,
            subject,
        ));
    }
    Some(questions)
}

/// Secondary path: synthesized arithmetic questions. Operand magnitude
/// scales with grade and the tier multiplier; options are four distinct
/// values shuffled uniformly, with the correct label assigned from the
/// post-shuffle position.
fn deterministic_batch(
    grade: i32,
    subject: &str,
    count: i32,
    difficulty: Difficulty,
) -> Vec<Question> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| arithmetic_question(&mut rng, grade, subject, difficulty))
        .collect()
}

fn arithmetic_question<R: Rng>(
    rng: &mut R,
    grade: i32,
    subject: &str,
    difficulty: Difficulty,
) -> Question {
    let magnitude = 5 * (i64::from(grade.max(0)) + 1) * difficulty.multiplier();
    let a = rng.gen_range(1..=magnitude);
    let b = rng.gen_range(1..=magnitude);

    let (op, answer) = match rng.gen_range(0..3) {
        0 => ('+', a + b),
        1 => ('-', a - b),
        _ => ('x', a * b),
    };

    let mut values = vec![answer];
    let mut offset = 1;
    while values.len() < 4 {
        for candidate in [answer + offset, answer - offset] {
            if values.len() < 4 && !values.contains(&candidate) {
                values.push(candidate);
            }
        }
        offset += rng.gen_range(1..=3);
    }
    values.shuffle(rng);

    let mut correct_label = OPTION_LABELS[0];
    let options: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let label = OPTION_LABELS[i];
            if *value == answer {
                correct_label = label;
            }
            format!("{}. {}", label, value)
        })
        .collect();

    let text = format!("What is {} {} {}?", a, op, b);
    let hint = format!("Work out {} {} {} one step at a time.", a, op, b);

    Question::new(&text, options, correct_label, &hint, difficulty, grade, subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::services::provider::MockTextGenerationProvider;
    use std::collections::HashSet;

    fn mix(easy: i32, medium: i32, hard: i32) -> DifficultyDistribution {
        DifficultyDistribution { easy, medium, hard }
    }

    fn failing_provider() -> Arc<MockTextGenerationProvider> {
        let mut provider = MockTextGenerationProvider::new();
        provider
            .expect_complete()
            .returning(|_, _, _| Err(AppError::ProviderError("unreachable".to_string())));
        Arc::new(provider)
    }

    /// Recompute the answer from the generated question text and check
    /// that the correct label really points at it.
    fn assert_correct_label_matches(question: &Question) {
        let text = question
            .text
            .strip_prefix("What is ")
            .and_then(|t| t.strip_suffix('?'))
            .expect("arithmetic question text");
        let parts: Vec<&str> = text.split_whitespace().collect();
        let a: i64 = parts[0].parse().unwrap();
        let b: i64 = parts[2].parse().unwrap();
        let answer = match parts[1] {
            "+" => a + b,
            "-" => a - b,
            "x" => a * b,
            other => panic!("unexpected operator {}", other),
        };

        let correct_value: i64 = question
            .options
            .iter()
            .find(|o| Question::option_label(o) == question.correct_option)
            .and_then(|o| o.split_once(". "))
            .map(|(_, v)| v.parse().unwrap())
            .expect("correct option present");
        assert_eq!(correct_value, answer);
    }

    #[tokio::test]
    async fn fallback_produces_exact_counts_per_tier() {
        let generator = QuestionGenerator::new(failing_provider());
        let questions = generator.generate(4, "Maths", mix(3, 2, 1)).await;

        assert_eq!(questions.len(), 6);
        let easy = questions.iter().filter(|q| q.difficulty == Difficulty::Easy);
        let medium = questions.iter().filter(|q| q.difficulty == Difficulty::Medium);
        let hard = questions.iter().filter(|q| q.difficulty == Difficulty::Hard);
        assert_eq!(easy.count(), 3);
        assert_eq!(medium.count(), 2);
        assert_eq!(hard.count(), 1);
    }

    #[tokio::test]
    async fn fallback_questions_have_distinct_options_and_valid_answer() {
        let generator = QuestionGenerator::new(failing_provider());
        let questions = generator.generate(6, "Maths", mix(5, 5, 5)).await;

        for question in &questions {
            assert_eq!(question.options.len(), 4);
            let values: HashSet<&str> = question
                .options
                .iter()
                .map(|o| o.split_once(". ").map(|(_, v)| v).unwrap_or(o))
                .collect();
            assert_eq!(values.len(), 4, "duplicate option values in {:?}", question);
            assert_correct_label_matches(question);
            assert!(!question.hint.is_empty());
        }
    }

    #[tokio::test]
    async fn zero_count_tiers_issue_no_provider_calls() {
        let mut provider = MockTextGenerationProvider::new();
        provider.expect_complete().never();
        let generator = QuestionGenerator::new(Arc::new(provider));

        let questions = generator.generate(3, "Maths", mix(0, 0, 0)).await;
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn provider_batch_is_used_when_parsable() {
        let mut provider = MockTextGenerationProvider::new();
        provider.expect_complete().returning(|_, _, _| {
            Ok(r#"Here you go:
[
  {"text": "What is the capital of France?",
   "options": ["A. Paris", "B. Lyon", "C. Nice", "D. Lille"],
   "correctOption": "A",
   "hint": "City of light.",
   "difficulty": "EASY"}
]
Hope this helps!"#
                .to_string())
        });
        let generator = QuestionGenerator::new(Arc::new(provider));

        let questions = generator.generate(5, "Geography", mix(1, 0, 0)).await;
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "What is the capital of France?");
        assert_eq!(questions[0].correct_option, "A");
        assert_eq!(questions[0].grade, 5);
        assert_eq!(questions[0].subject, "Geography");
        assert_eq!(questions[0].difficulty, Difficulty::Easy);
    }

    #[tokio::test]
    async fn unparsable_reply_falls_back_per_tier() {
        let mut provider = MockTextGenerationProvider::new();
        provider
            .expect_complete()
            .returning(|_, _, _| Ok("Sorry, I cannot help with that.".to_string()));
        let generator = QuestionGenerator::new(Arc::new(provider));

        let questions = generator.generate(3, "Maths", mix(2, 0, 0)).await;
        // Deterministic fallback still honors the mix
        assert_eq!(questions.len(), 2);
        for question in &questions {
            assert_correct_label_matches(question);
        }
    }

    #[test]
    fn batch_with_wrong_count_is_discarded() {
        let content = r#"[{"text": "Q", "options": ["A. 1", "B. 2"], "correctOption": "A"}]"#;
        assert!(parse_question_batch(content, 2, Difficulty::Easy, 1, "Maths").is_none());
    }

    #[test]
    fn batch_with_unknown_correct_option_is_discarded() {
        let content =
            r#"[{"text": "Q", "options": ["A. 1", "B. 2"], "correctOption": "E"}]"#;
        assert!(parse_question_batch(content, 1, Difficulty::Easy, 1, "Maths").is_none());
    }

    #[test]
    fn batch_with_empty_text_is_discarded() {
        let content =
            r#"[{"text": "  ", "options": ["A. 1", "B. 2"], "correctOption": "A"}]"#;
        assert!(parse_question_batch(content, 1, Difficulty::Easy, 1, "Maths").is_none());
    }

    #[test]
    fn correct_option_may_be_a_full_option_string() {
        let content =
            r#"[{"text": "Pick true", "options": ["true", "false"], "correctOption": "true"}]"#;
        let batch = parse_question_batch(content, 1, Difficulty::Medium, 2, "Logic")
            .expect("full-string correct option accepted");
        assert_eq!(batch[0].correct_option, "true");
    }

    #[test]
    fn malformed_json_is_discarded_not_repaired() {
        let content = r#"[{"text": "Q", "options": ["A. 1"], "correctOption": "A""#;
        assert!(parse_question_batch(content, 1, Difficulty::Easy, 1, "Maths").is_none());
    }
}
