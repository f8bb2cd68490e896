use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use validator::Validate;

use crate::{
    constants::prompts,
    errors::{AppError, AppResult},
    models::{
        domain::{Difficulty, Question, QuestionResponse, Quiz, Submission},
        dto::{
            request::{GenerateQuizRequest, HistoryQuery, ResponseInput},
            response::{
                HistoryResponse, HintResponse, QuizResponse, SubmissionDto, SubmissionResponse,
            },
        },
    },
    repositories::{HistoryFilter, QuizRepository, SubmissionRepository},
    services::{
        allocator::{DifficultyAllocator, PerformanceRates},
        evaluation::EvaluationEngine,
        generator::QuestionGenerator,
        provider::TextGenerationProvider,
        suggestion::SuggestionGenerator,
    },
};

const HINT_MAX_TOKENS: u32 = 100;
const HINT_TEMPERATURE: f32 = 0.5;
/// How many recent submissions feed the per-tier performance rates.
const PERFORMANCE_WINDOW: i64 = 10;

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    provider: Arc<dyn TextGenerationProvider>,
    generator: QuestionGenerator,
    suggestions: SuggestionGenerator,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        provider: Arc<dyn TextGenerationProvider>,
    ) -> Self {
        Self {
            quizzes,
            submissions,
            generator: QuestionGenerator::new(provider.clone()),
            suggestions: SuggestionGenerator::new(provider.clone()),
            provider,
        }
    }

    /// Allocate a difficulty mix from the creator's history, generate
    /// matching questions, and persist quiz plus questions atomically.
    pub async fn generate_quiz(
        &self,
        creator_id: &str,
        request: GenerateQuizRequest,
    ) -> AppResult<QuizResponse> {
        request.validate()?;

        let rates = self.past_performance(creator_id).await?;
        let mix = DifficultyAllocator::allocate(request.total_questions, rates);

        let questions = self
            .generator
            .generate(request.grade, &request.subject, mix)
            .await;

        let quiz = Quiz::new(
            creator_id,
            request.grade,
            &request.subject,
            request.max_score,
            mix,
            questions.iter().map(|q| q.id.clone()).collect(),
        );

        let quiz = self
            .quizzes
            .create_quiz_with_questions(quiz, questions.clone())
            .await?;

        log::info!(
            "generated quiz {} for user {} (grade {}, {}, {} questions)",
            quiz.id,
            creator_id,
            quiz.grade,
            quiz.subject,
            quiz.total_questions
        );

        Ok(QuizResponse::from_parts(quiz, questions))
    }

    pub async fn get_hint(&self, quiz_id: &str, question_id: &str) -> AppResult<HintResponse> {
        let quiz = self.require_quiz(quiz_id).await?;
        if !quiz.question_ids.iter().any(|id| id == question_id) {
            return Err(AppError::NotFound(format!(
                "Question '{}' does not belong to quiz '{}'",
                question_id, quiz_id
            )));
        }

        let question = self
            .quizzes
            .find_question_by_id(question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })?;

        let hint = match self
            .provider
            .complete(
                &prompts::hint_prompt(&question.text),
                HINT_MAX_TOKENS,
                HINT_TEMPERATURE,
            )
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                log::warn!("hint provider failed ({}), using stored hint", err);
                if question.hint.trim().is_empty() {
                    "Think step by step.".to_string()
                } else {
                    question.hint.clone()
                }
            }
        };

        Ok(HintResponse { hint })
    }

    pub async fn submit(
        &self,
        user_id: &str,
        quiz_id: &str,
        responses: Vec<ResponseInput>,
    ) -> AppResult<SubmissionResponse> {
        self.record_attempt(user_id, quiz_id, responses, false).await
    }

    /// A retry is a new, independent submission that is always marked
    /// as such.
    pub async fn retry(
        &self,
        user_id: &str,
        quiz_id: &str,
        responses: Vec<ResponseInput>,
    ) -> AppResult<SubmissionResponse> {
        self.record_attempt(user_id, quiz_id, responses, true).await
    }

    async fn record_attempt(
        &self,
        user_id: &str,
        quiz_id: &str,
        responses: Vec<ResponseInput>,
        forced_retry: bool,
    ) -> AppResult<SubmissionResponse> {
        let quiz = self.require_quiz(quiz_id).await?;
        let questions = self.quizzes.find_questions_by_ids(&quiz.question_ids).await?;

        let responses: Vec<QuestionResponse> = responses
            .into_iter()
            .map(|r| QuestionResponse {
                question_id: r.question_id,
                user_response: r.user_response,
            })
            .collect();

        let evaluation = EvaluationEngine::evaluate(&quiz, &questions, &responses);
        let suggestions = self.suggestions.suggest(&evaluation.mistakes).await;

        let prior_attempts = self
            .submissions
            .count_by_user_and_quiz(user_id, quiz_id)
            .await?;
        let is_retry = forced_retry || prior_attempts > 0;

        let submission = self
            .submissions
            .create(Submission::new(
                quiz_id,
                user_id,
                responses,
                evaluation.score,
                quiz.max_score,
                is_retry,
            ))
            .await?;

        Ok(SubmissionResponse {
            submission_id: submission.id,
            score: evaluation.score,
            max_score: quiz.max_score,
            is_retry,
            mistakes: evaluation.mistakes,
            suggestions,
        })
    }

    pub async fn history(
        &self,
        user_id: &str,
        query: HistoryQuery,
    ) -> AppResult<HistoryResponse> {
        let quiz_ids = if query.grade.is_some() || query.subject.is_some() {
            Some(
                self.quizzes
                    .find_quiz_ids(query.grade, query.subject.as_deref())
                    .await?,
            )
        } else {
            None
        };

        let filter = HistoryFilter {
            quiz_ids,
            min_score: query.min_marks,
            max_score: query.max_marks,
            from: query.from.map(start_of_day),
            to: query.to.map(end_of_day),
            offset: query.offset(),
            limit: query.limit(),
        };

        let submissions = self.submissions.find_history(user_id, filter).await?;

        Ok(HistoryResponse {
            submissions: submissions.into_iter().map(SubmissionDto::from).collect(),
            page: query.page.max(1),
            limit: query.limit(),
        })
    }

    async fn require_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    /// Per-tier correct rates over the user's recent submissions.
    /// Returns `None` for a user with no answered questions on record.
    async fn past_performance(&self, user_id: &str) -> AppResult<Option<PerformanceRates>> {
        let recent = self
            .submissions
            .find_recent_by_user(user_id, PERFORMANCE_WINDOW)
            .await?;
        if recent.is_empty() {
            return Ok(None);
        }

        let question_ids: Vec<String> = recent
            .iter()
            .flat_map(|s| s.responses.iter().map(|r| r.question_id.clone()))
            .collect();
        let questions = self.quizzes.find_questions_by_ids(&question_ids).await?;
        let by_id: HashMap<&str, &Question> =
            questions.iter().map(|q| (q.id.as_str(), q)).collect();

        // (correct, total) per tier
        let mut tallies: HashMap<Difficulty, (u32, u32)> = HashMap::new();
        for submission in &recent {
            for response in &submission.responses {
                let Some(question) = by_id.get(response.question_id.as_str()) else {
                    continue;
                };
                let entry = tallies.entry(question.difficulty).or_insert((0, 0));
                entry.1 += 1;
                if response.user_response == question.correct_option {
                    entry.0 += 1;
                }
            }
        }

        let rate = |difficulty: Difficulty| {
            tallies
                .get(&difficulty)
                .filter(|(_, total)| *total > 0)
                .map(|(correct, total)| f64::from(*correct) / f64::from(*total))
        };

        let rates = PerformanceRates {
            easy_rate: rate(Difficulty::Easy),
            medium_rate: rate(Difficulty::Medium),
            hard_rate: rate(Difficulty::Hard),
        };

        if rates == PerformanceRates::default() {
            Ok(None)
        } else {
            Ok(Some(rates))
        }
    }
}

fn start_of_day(date: chrono::NaiveDate) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc)
}

fn end_of_day(date: chrono::NaiveDate) -> DateTime<Utc> {
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    DateTime::from_naive_utc_and_offset(date.and_time(end), Utc)
}
