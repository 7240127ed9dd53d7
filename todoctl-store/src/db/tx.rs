//! PostgreSQL store and transaction
//!
//! A statement error leaves the server-side transaction aborted. `PgTx`
//! tracks that so `commit` reports the failure instead of PostgreSQL's
//! silent ROLLBACK.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};

use crate::error::{StoreError, StoreResult};
use crate::models::{CreateLabel, CreateTodo, Label, Todo, TodoLabel, UpdateTodo};
use crate::store::{Store, Transaction};
use crate::StoreConfig;

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool capped at `config.max_connections`.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        tracing::debug!(max_connections = config.max_connections, "connected to database");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> StoreResult<PgTx> {
        let tx = self.pool.begin().await?;
        Ok(PgTx { tx, aborted: false })
    }
}

/// Open PostgreSQL transaction
pub struct PgTx {
    tx: sqlx::Transaction<'static, Postgres>,
    aborted: bool,
}

impl PgTx {
    fn ensure_active(&self) -> StoreResult<()> {
        if self.aborted {
            return Err(StoreError::TransactionAborted);
        }
        Ok(())
    }

    fn track<T>(&mut self, result: Result<T, sqlx::Error>) -> StoreResult<T> {
        result.map_err(|err| {
            self.aborted = true;
            let err = StoreError::from(err);
            tracing::debug!("statement failed, transaction aborted: {}", err);
            err
        })
    }

    async fn reserve_id(&mut self, table: &'static str) -> StoreResult<i32> {
        self.ensure_active()?;
        let result = sqlx::query_scalar::<_, i32>(
            "SELECT nextval(pg_get_serial_sequence($1, 'id'))::integer",
        )
        .bind(table)
        .fetch_one(&mut *self.tx)
        .await;
        self.track(result)
    }
}

#[async_trait]
impl Transaction for PgTx {
    async fn reserve_label_id(&mut self) -> StoreResult<i32> {
        self.reserve_id("labels").await
    }

    async fn insert_label(&mut self, payload: &CreateLabel) -> StoreResult<Label> {
        self.ensure_active()?;
        let result = sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (name) VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(payload.name.as_str())
        .fetch_one(&mut *self.tx)
        .await;
        self.track(result)
    }

    async fn insert_label_with_id(&mut self, id: i32, payload: &CreateLabel) -> StoreResult<Label> {
        self.ensure_active()?;
        let result = sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (id, name) VALUES ($1, $2)
            RETURNING id, name
            "#,
        )
        .bind(id)
        .bind(payload.name.as_str())
        .fetch_one(&mut *self.tx)
        .await;
        self.track(result)
    }

    async fn find_label(&mut self, id: i32) -> StoreResult<Option<Label>> {
        self.ensure_active()?;
        let result = sqlx::query_as::<_, Label>("SELECT id, name FROM labels WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await;
        self.track(result)
    }

    async fn list_labels(&mut self) -> StoreResult<Vec<Label>> {
        self.ensure_active()?;
        let result = sqlx::query_as::<_, Label>("SELECT id, name FROM labels ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await;
        self.track(result)
    }

    async fn delete_label(&mut self, id: i32) -> StoreResult<bool> {
        self.ensure_active()?;
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await;
        Ok(self.track(result)?.rows_affected() > 0)
    }

    async fn reserve_todo_id(&mut self) -> StoreResult<i32> {
        self.reserve_id("todos").await
    }

    async fn insert_todo(&mut self, payload: &CreateTodo) -> StoreResult<Todo> {
        self.ensure_active()?;
        let result = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (text, completed) VALUES ($1, false)
            RETURNING id, text, completed
            "#,
        )
        .bind(payload.text.as_str())
        .fetch_one(&mut *self.tx)
        .await;
        self.track(result)
    }

    async fn insert_todo_with_id(&mut self, id: i32, payload: &CreateTodo) -> StoreResult<Todo> {
        self.ensure_active()?;
        let result = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, text, completed) VALUES ($1, $2, false)
            RETURNING id, text, completed
            "#,
        )
        .bind(id)
        .bind(payload.text.as_str())
        .fetch_one(&mut *self.tx)
        .await;
        self.track(result)
    }

    async fn find_todo(&mut self, id: i32) -> StoreResult<Option<Todo>> {
        self.ensure_active()?;
        let result =
            sqlx::query_as::<_, Todo>("SELECT id, text, completed FROM todos WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await;
        self.track(result)
    }

    async fn list_todos(&mut self) -> StoreResult<Vec<Todo>> {
        self.ensure_active()?;
        let result =
            sqlx::query_as::<_, Todo>("SELECT id, text, completed FROM todos ORDER BY id DESC")
                .fetch_all(&mut *self.tx)
                .await;
        self.track(result)
    }

    async fn update_todo(&mut self, id: i32, update: &UpdateTodo) -> StoreResult<Option<Todo>> {
        self.ensure_active()?;
        // Single statement: unset fields keep their stored value
        let result = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET text = COALESCE($1, text), completed = COALESCE($2, completed)
            WHERE id = $3
            RETURNING id, text, completed
            "#,
        )
        .bind(update.text.as_ref().map(|t| t.as_str()))
        .bind(update.completed)
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await;
        self.track(result)
    }

    async fn delete_todo(&mut self, id: i32) -> StoreResult<bool> {
        self.ensure_active()?;
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await;
        Ok(self.track(result)?.rows_affected() > 0)
    }

    async fn attach(&mut self, todo_id: i32, label_id: i32) -> StoreResult<TodoLabel> {
        self.ensure_active()?;
        let result = sqlx::query_as::<_, TodoLabel>(
            r#"
            INSERT INTO todo_labels (todo_id, label_id) VALUES ($1, $2)
            RETURNING todo_id, label_id
            "#,
        )
        .bind(todo_id)
        .bind(label_id)
        .fetch_one(&mut *self.tx)
        .await;
        self.track(result)
    }

    async fn detach(&mut self, todo_id: i32, label_id: i32) -> StoreResult<bool> {
        self.ensure_active()?;
        let result = sqlx::query("DELETE FROM todo_labels WHERE todo_id = $1 AND label_id = $2")
            .bind(todo_id)
            .bind(label_id)
            .execute(&mut *self.tx)
            .await;
        Ok(self.track(result)?.rows_affected() > 0)
    }

    async fn clear_labels(&mut self, todo_id: i32) -> StoreResult<u64> {
        self.ensure_active()?;
        let result = sqlx::query("DELETE FROM todo_labels WHERE todo_id = $1")
            .bind(todo_id)
            .execute(&mut *self.tx)
            .await;
        Ok(self.track(result)?.rows_affected())
    }

    async fn labels_for_todo(&mut self, todo_id: i32) -> StoreResult<Vec<Label>> {
        self.ensure_active()?;
        let result = sqlx::query_as::<_, Label>(
            r#"
            SELECT l.id, l.name
            FROM labels l
            JOIN todo_labels tl ON tl.label_id = l.id
            WHERE tl.todo_id = $1
            ORDER BY l.id
            "#,
        )
        .bind(todo_id)
        .fetch_all(&mut *self.tx)
        .await;
        self.track(result)
    }

    async fn todo_ids_for_label(&mut self, label_id: i32) -> StoreResult<Vec<i32>> {
        self.ensure_active()?;
        let result = sqlx::query_scalar::<_, i32>(
            "SELECT todo_id FROM todo_labels WHERE label_id = $1 ORDER BY todo_id",
        )
        .bind(label_id)
        .fetch_all(&mut *self.tx)
        .await;
        self.track(result)
    }

    async fn check_deferred(&mut self) -> StoreResult<()> {
        self.ensure_active()?;
        // Switching to IMMEDIATE runs the pending checks; switch back after
        let result = sqlx::query("SET CONSTRAINTS ALL IMMEDIATE")
            .execute(&mut *self.tx)
            .await;
        self.track(result)?;
        let result = sqlx::query("SET CONSTRAINTS ALL DEFERRED")
            .execute(&mut *self.tx)
            .await;
        self.track(result)?;
        Ok(())
    }

    async fn commit(self) -> StoreResult<()> {
        if self.aborted {
            self.tx.rollback().await?;
            return Err(StoreError::TransactionAborted);
        }
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
