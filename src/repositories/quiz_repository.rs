use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Client, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{Question, Quiz},
};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist a quiz together with its questions, all or nothing.
    async fn create_quiz_with_questions(
        &self,
        quiz: Quiz,
        questions: Vec<Question>,
    ) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_question_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    /// Fetch questions by id, returned in the order the ids were given.
    async fn find_questions_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>>;
    /// Ids of quizzes matching a grade/subject filter, for history
    /// queries that restrict submissions by quiz classification.
    async fn find_quiz_ids(
        &self,
        grade: Option<i32>,
        subject: Option<&str>,
    ) -> AppResult<Vec<String>>;
}

pub struct MongoQuizRepository {
    client: Client,
    quizzes: Collection<Quiz>,
    questions: Collection<Question>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            client: db.client().clone(),
            quizzes: db.get_collection("quizzes"),
            questions: db.get_collection("questions"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes and questions collections");

        let quiz_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();
        self.quizzes.create_index(quiz_id_index).await?;

        let question_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();
        self.questions.create_index(question_id_index).await?;

        let grade_subject_index = IndexModel::builder()
            .keys(doc! { "grade": 1, "subject": 1 })
            .options(
                IndexOptions::builder()
                    .name("grade_subject".to_string())
                    .build(),
            )
            .build();
        self.quizzes.create_index(grade_subject_index).await?;

        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create_quiz_with_questions(
        &self,
        quiz: Quiz,
        questions: Vec<Question>,
    ) -> AppResult<Quiz> {
        // Both inserts ride one transaction so a crash mid-creation
        // cannot leave orphaned questions. Dropping the session aborts
        // anything uncommitted.
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        if !questions.is_empty() {
            self.questions
                .insert_many(&questions)
                .session(&mut session)
                .await?;
        }
        self.quizzes.insert_one(&quiz).session(&mut session).await?;

        session.commit_transaction().await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.quizzes.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_question_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.questions.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_questions_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        let cursor = self
            .questions
            .find(doc! { "id": { "$in": ids } })
            .await?;
        let found: Vec<Question> = cursor.try_collect().await?;

        // The store does not guarantee `$in` order; restore quiz order
        let mut by_id: HashMap<String, Question> =
            found.into_iter().map(|q| (q.id.clone(), q)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn find_quiz_ids(
        &self,
        grade: Option<i32>,
        subject: Option<&str>,
    ) -> AppResult<Vec<String>> {
        let mut filter = doc! {};
        if let Some(grade) = grade {
            filter.insert("grade", grade);
        }
        if let Some(subject) = subject {
            filter.insert("subject", subject);
        }

        let cursor = self.quizzes.find(filter).await?;
        let quizzes: Vec<Quiz> = cursor.try_collect().await?;
        Ok(quizzes.into_iter().map(|q| q.id).collect())
    }
}
