use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::{domain::Submission, dto::response::LeaderboardEntry},
};

/// Store-level filter for the history view. Grade/subject have already
/// been resolved to a quiz-id set by the caller.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub quiz_ids: Option<Vec<String>>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub offset: i64,
    pub limit: i64,
}

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, submission: Submission) -> AppResult<Submission>;
    async fn count_by_user_and_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<u64>;
    async fn find_history(
        &self,
        user_id: &str,
        filter: HistoryFilter,
    ) -> AppResult<Vec<Submission>>;
    /// Most recent submissions for a user, newest first.
    async fn find_recent_by_user(&self, user_id: &str, limit: i64)
        -> AppResult<Vec<Submission>>;
    /// Best score per user over submissions whose quiz matches the
    /// filter, ranked descending. Pushed down to the store as an
    /// aggregation pipeline rather than loading the full history.
    async fn leaderboard(
        &self,
        grade: Option<i32>,
        subject: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<LeaderboardEntry>>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<Submission>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("submissions"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for submissions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1 })
            .options(IndexOptions::builder().name("user_quiz".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_quiz_index).await?;

        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        self.collection.insert_one(&submission).await?;
        Ok(submission)
    }

    async fn count_by_user_and_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id, "quiz_id": quiz_id })
            .await?;
        Ok(count)
    }

    async fn find_history(
        &self,
        user_id: &str,
        filter: HistoryFilter,
    ) -> AppResult<Vec<Submission>> {
        let mut query = doc! { "user_id": user_id };

        if let Some(quiz_ids) = &filter.quiz_ids {
            query.insert("quiz_id", doc! { "$in": quiz_ids });
        }

        let mut score = Document::new();
        if let Some(min) = filter.min_score {
            score.insert("$gte", min);
        }
        if let Some(max) = filter.max_score {
            score.insert("$lte", max);
        }
        if !score.is_empty() {
            query.insert("score", score);
        }

        let mut completed = Document::new();
        if let Some(from) = filter.from {
            completed.insert(
                "$gte",
                Bson::DateTime(mongodb::bson::DateTime::from_millis(from.timestamp_millis())),
            );
        }
        if let Some(to) = filter.to {
            completed.insert(
                "$lte",
                Bson::DateTime(mongodb::bson::DateTime::from_millis(to.timestamp_millis())),
            );
        }
        if !completed.is_empty() {
            query.insert("completed_at", completed);
        }

        let submissions = self
            .collection
            .find(query)
            .sort(doc! { "completed_at": -1 })
            .skip(filter.offset.max(0) as u64)
            .limit(filter.limit)
            .await?
            .try_collect()
            .await?;

        Ok(submissions)
    }

    async fn find_recent_by_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> AppResult<Vec<Submission>> {
        let submissions = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "completed_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok(submissions)
    }

    async fn leaderboard(
        &self,
        grade: Option<i32>,
        subject: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let mut match_doc = Document::new();
        if let Some(grade) = grade {
            match_doc.insert("quiz.grade", grade);
        }
        if let Some(subject) = subject {
            match_doc.insert("quiz.subject", subject);
        }

        let pipeline = vec![
            doc! { "$lookup": {
                "from": "quizzes",
                "localField": "quiz_id",
                "foreignField": "id",
                "as": "quiz"
            }},
            doc! { "$unwind": "$quiz" },
            doc! { "$match": match_doc },
            doc! { "$group": {
                "_id": "$user_id",
                "bestScore": { "$max": "$score" },
                // Artifact of the join; which quiz id survives is
                // unspecified and consumers must not rely on it
                "quizId": { "$first": "$quiz.id" }
            }},
            doc! { "$sort": { "bestScore": -1 } },
            doc! { "$limit": limit },
            doc! { "$lookup": {
                "from": "users",
                "localField": "_id",
                "foreignField": "id",
                "as": "user"
            }},
            doc! { "$unwind": "$user" },
            doc! { "$project": {
                "_id": 0,
                "userId": "$_id",
                "username": "$user.username",
                "bestScore": 1,
                "quizId": 1
            }},
        ];

        let cursor = self.collection.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(|document| Ok(mongodb::bson::from_document(document)?))
            .collect()
    }
}
