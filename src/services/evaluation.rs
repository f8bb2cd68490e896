use std::collections::HashMap;

use serde::Serialize;

use crate::models::domain::{Question, QuestionResponse, Quiz};

/// One incorrectly answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mistake {
    pub question_id: String,
    pub text: String,
    pub correct_option: String,
    pub user_response: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub max_score: f64,
    pub per_question_score: f64,
    pub correct_count: usize,
    pub mistakes: Vec<Mistake>,
}

pub struct EvaluationEngine;

impl EvaluationEngine {
    /// Score a response set against a quiz. Unknown question ids are
    /// silently skipped; comparison against the correct option is an
    /// exact, case-sensitive string match. Never fails: any response
    /// set produces a deterministic result.
    ///
    /// Duplicate responses for the same question each score
    /// independently, matching the source system. With duplicates the
    /// rounded score can exceed `max_score`; see the tests.
    pub fn evaluate(quiz: &Quiz, questions: &[Question], responses: &[QuestionResponse]) -> Evaluation {
        let per_question_score = if quiz.total_questions > 0 {
            quiz.max_score / quiz.total_questions as f64
        } else {
            0.0
        };

        let by_id: HashMap<&str, &Question> =
            questions.iter().map(|q| (q.id.as_str(), q)).collect();

        let mut score = 0.0;
        let mut correct_count = 0;
        let mut mistakes = Vec::new();

        for response in responses {
            let Some(question) = by_id.get(response.question_id.as_str()) else {
                continue;
            };

            if response.user_response == question.correct_option {
                score += per_question_score;
                correct_count += 1;
            } else {
                mistakes.push(Mistake {
                    question_id: question.id.clone(),
                    text: question.text.clone(),
                    correct_option: question.correct_option.clone(),
                    user_response: response.user_response.clone(),
                });
            }
        }

        Evaluation {
            score: round2(score),
            max_score: quiz.max_score,
            per_question_score,
            correct_count,
            mistakes,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
