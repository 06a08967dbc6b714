use uuid::Uuid;

use crate::core::access::{ensure, owns_review};
use crate::core::{approval, Role, ScheduleError};
use crate::models::{NewReview, Review, ReviewPatch};
use crate::services::connections::fetch_pair;
use crate::services::postgres::{PostgresClient, PostgresError};

const REVIEW_COLUMNS: &str = "id, babysitter_id, family_id, review_text, rating, created_at";

impl PostgresClient {
    /// Review a babysitter the family is connected with
    pub async fn create_review(&self, family_id: Uuid, review: &NewReview) -> Result<Review, PostgresError> {
        if !self.babysitter_exists(review.babysitter_id).await? {
            return Err(PostgresError::not_found("Babysitter"));
        }

        let pair = fetch_pair(&self.pool, review.babysitter_id, family_id).await?;
        if !approval::is_approved(&pair, review.babysitter_id, family_id) {
            return Err(ScheduleError::not_connected().into());
        }

        let created: Review = sqlx::query_as(&format!(
            r#"
            INSERT INTO reviews (id, babysitter_id, family_id, review_text, rating)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(review.babysitter_id)
        .bind(family_id)
        .bind(&review.review_text)
        .bind(review.rating)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Family {} reviewed babysitter {}", family_id, review.babysitter_id);
        Ok(created)
    }

    pub async fn list_reviews(&self, babysitter_id: Uuid) -> Result<Vec<Review>, PostgresError> {
        let reviews = sqlx::query_as(&format!(
            "SELECT {} FROM reviews WHERE babysitter_id = $1 ORDER BY created_at DESC",
            REVIEW_COLUMNS
        ))
        .bind(babysitter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn get_review(&self, review_id: Uuid) -> Result<Review, PostgresError> {
        sqlx::query_as(&format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS))
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::not_found("Review"))
    }

    pub async fn update_review(
        &self,
        role: &Role,
        review_id: Uuid,
        patch: &ReviewPatch,
    ) -> Result<Review, PostgresError> {
        let review = self.get_review(review_id).await?;
        ensure(owns_review(role, &review), "review")?;

        let updated = sqlx::query_as(&format!(
            r#"
            UPDATE reviews SET
                review_text = COALESCE($2, review_text),
                rating = COALESCE($3, rating)
            WHERE id = $1
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(review_id)
        .bind(&patch.review_text)
        .bind(patch.rating)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete_review(&self, role: &Role, review_id: Uuid) -> Result<(), PostgresError> {
        let review = self.get_review(review_id).await?;
        ensure(owns_review(role, &review), "review")?;

        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Deleted review {}", review_id);
        Ok(())
    }
}
