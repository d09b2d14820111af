//! Postgres event store.
//!
//! Stroke order comes from the `bigserial` primary key, so acceptance order
//! is exactly insert order and replay is a single ordered scan. The schema
//! lives in `src/db/migrations` and is applied at startup.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::protocol::{NoteFields, NoteId, StickyNote, Stroke};
use crate::store::{EventStore, StoreError};

/// sqlx-backed store; cheap to clone via the inner pool.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn append_stroke(&self, board_id: &str, stroke: &Stroke) -> Result<Stroke, StoreError> {
        sqlx::query(
            "INSERT INTO strokes (board_id, x, y, prev_x, prev_y, color, line_width) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(board_id)
        .bind(stroke.x)
        .bind(stroke.y)
        .bind(stroke.prev_x)
        .bind(stroke.prev_y)
        .bind(&stroke.color)
        .bind(stroke.line_width)
        .execute(&self.pool)
        .await?;

        Ok(stroke.clone())
    }

    async fn list_strokes(&self, board_id: &str) -> Result<Vec<Stroke>, StoreError> {
        let rows = sqlx::query_as::<_, (f64, f64, f64, f64, String, i32)>(
            "SELECT x, y, prev_x, prev_y, color, line_width \
             FROM strokes WHERE board_id = $1 ORDER BY id ASC",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(x, y, prev_x, prev_y, color, line_width)| Stroke { x, y, prev_x, prev_y, color, line_width })
            .collect())
    }

    async fn upsert_sticky_note(
        &self,
        board_id: &str,
        id: Option<NoteId>,
        fields: &NoteFields,
    ) -> Result<StickyNote, StoreError> {
        let note_id = match id {
            None => {
                let (new_id,): (NoteId,) = sqlx::query_as(
                    "INSERT INTO sticky_notes (board_id, text, x, y, color, width, height) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
                )
                .bind(board_id)
                .bind(&fields.text)
                .bind(fields.x)
                .bind(fields.y)
                .bind(&fields.color)
                .bind(fields.width)
                .bind(fields.height)
                .fetch_one(&self.pool)
                .await?;
                new_id
            }
            Some(existing) => {
                let result = sqlx::query(
                    "UPDATE sticky_notes \
                     SET text = $3, x = $4, y = $5, color = $6, width = $7, height = $8, updated_at = now() \
                     WHERE id = $1 AND board_id = $2",
                )
                .bind(existing)
                .bind(board_id)
                .bind(&fields.text)
                .bind(fields.x)
                .bind(fields.y)
                .bind(&fields.color)
                .bind(fields.width)
                .bind(fields.height)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::NoteNotFound(existing));
                }
                existing
            }
        };

        Ok(StickyNote::from_fields(note_id, fields.clone()))
    }

    async fn list_sticky_notes(&self, board_id: &str) -> Result<Vec<StickyNote>, StoreError> {
        let rows = sqlx::query_as::<_, (NoteId, String, f64, f64, String, i32, i32)>(
            "SELECT id, text, x, y, color, width, height \
             FROM sticky_notes WHERE board_id = $1 ORDER BY id ASC",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, text, x, y, color, width, height)| StickyNote { id, text, x, y, color, width, height })
            .collect())
    }

    async fn delete_sticky_note(&self, board_id: &str, id: NoteId) -> Result<(), StoreError> {
        // Zero rows affected is fine: delete is idempotent by contract.
        sqlx::query("DELETE FROM sticky_notes WHERE id = $1 AND board_id = $2")
            .bind(id)
            .bind(board_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear_board(&self, board_id: &str) -> Result<(), StoreError> {
        // One transaction: a concurrent add/update lands entirely before or
        // entirely after the clear, never inside it.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM strokes WHERE board_id = $1")
            .bind(board_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sticky_notes WHERE board_id = $1")
            .bind(board_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
