//! Repository for the `titles` table and its `title_genres` join table.
//!
//! Reads always join the category and compute the rating on the fly, so a
//! title's rating reflects every review committed before the read.

use sqlx::PgPool;
use yamdb_core::search::escape_like;
use yamdb_core::types::DbId;

use crate::models::title::{CreateTitle, TitleGenreRow, TitleListParams, TitleRow, UpdateTitle};

/// Projection shared by every read. `rating` is `NULL` when no reviews exist.
const SELECT_ROW: &str = "SELECT t.id, t.name, t.year, t.description, \
                          c.name AS category_name, c.slug AS category_slug, \
                          (SELECT AVG(r.score)::FLOAT8 FROM reviews r WHERE r.title_id = t.id) AS rating \
                          FROM titles t \
                          LEFT JOIN categories c ON c.id = t.category_id";

/// Filter shared by [`TitleRepo::list`] and [`TitleRepo::count`]; `NULL`
/// parameters disable their clause.
const FILTER: &str = "WHERE ($1::TEXT IS NULL OR c.slug = $1) \
                      AND ($2::TEXT IS NULL OR EXISTS ( \
                          SELECT 1 FROM title_genres tg \
                          JOIN genres g ON g.id = tg.genre_id \
                          WHERE tg.title_id = t.id AND g.slug = $2)) \
                      AND ($3::TEXT IS NULL OR t.name ILIKE '%' || $3 || '%') \
                      AND ($4::INTEGER IS NULL OR t.year = $4)";

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<TitleRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(&input.genre_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a title by ID, with its category and rating.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TitleRow>, sqlx::Error> {
        let query = format!("{SELECT_ROW} WHERE t.id = $1");
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a title with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles matching the filter, ordered by ID.
    pub async fn list(
        pool: &PgPool,
        params: &TitleListParams,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleRow>, sqlx::Error> {
        let query = format!("{SELECT_ROW} {FILTER} ORDER BY t.id LIMIT $5 OFFSET $6");
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(&params.category)
            .bind(&params.genre)
            .bind(params.name.as_deref().map(escape_like))
            .bind(params.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count titles matching the same filter as [`TitleRepo::list`].
    pub async fn count(pool: &PgPool, params: &TitleListParams) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM titles t \
             LEFT JOIN categories c ON c.id = t.category_id {FILTER}"
        );
        sqlx::query_scalar(&query)
            .bind(&params.category)
            .bind(&params.genre)
            .bind(params.name.as_deref().map(escape_like))
            .bind(params.year)
            .fetch_one(pool)
            .await
    }

    /// Genres attached to each of the given titles, ordered by genre name.
    pub async fn genres_for(
        pool: &PgPool,
        title_ids: &[DbId],
    ) -> Result<Vec<TitleGenreRow>, sqlx::Error> {
        sqlx::query_as::<_, TitleGenreRow>(
            "SELECT tg.title_id, g.name, g.slug
             FROM title_genres tg
             JOIN genres g ON g.id = tg.genre_id
             WHERE tg.title_id = ANY($1)
             ORDER BY tg.title_id, g.name",
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await
    }

    /// Update a title. Only non-`None` fields in `input` are applied; a
    /// `Some` genre list replaces the current set.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
    ) -> Result<Option<TitleRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(genre_ids) = &input.genre_ids {
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO title_genres (title_id, genre_id)
                 SELECT $1, UNNEST($2::BIGINT[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(genre_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id).await
    }

    /// Delete a title together with its reviews and their comments.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
