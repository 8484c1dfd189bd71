//! Repository for the `exercises` table, limited to what the catalog
//! import needs.

use sqlx::PgPool;

use crate::models::exercise::{CreateExercise, Exercise};

/// Column list for `exercises` queries.
const COLUMNS: &str = "id, name, total_weight_multiplier, external_id, force, level, \
    mechanic, equipment, category, primary_muscles, secondary_muscles, \
    instructions, images, created_at, updated_at";

/// Provides lookup and bulk insert for exercises.
pub struct ExerciseRepo;

impl ExerciseRepo {
    /// Find an exercise by its external catalog id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<Exercise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exercises WHERE external_id = $1");
        sqlx::query_as::<_, Exercise>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an exercise with this external id exists.
    pub async fn exists_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM exercises WHERE external_id = $1)",
        )
        .bind(external_id)
        .fetch_one(pool)
        .await
    }

    /// Insert all exercises in one transaction. Either every row is written
    /// or none is.
    ///
    /// Returns the number of rows inserted.
    pub async fn create_batch(
        pool: &PgPool,
        exercises: &[CreateExercise],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for exercise in exercises {
            let result = sqlx::query(
                "INSERT INTO exercises \
                    (name, external_id, force, level, mechanic, equipment, category, \
                     primary_muscles, secondary_muscles, instructions, images) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            )
            .bind(&exercise.name)
            .bind(&exercise.external_id)
            .bind(&exercise.force)
            .bind(&exercise.level)
            .bind(&exercise.mechanic)
            .bind(&exercise.equipment)
            .bind(&exercise.category)
            .bind(&exercise.primary_muscles)
            .bind(&exercise.secondary_muscles)
            .bind(&exercise.instructions)
            .bind(&exercise.images)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Count all exercises.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exercises")
            .fetch_one(pool)
            .await
    }
}
