use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::entity::Entity;
use crate::database::manager::DatabaseError;
use crate::database::query_builder::{bind_param_query, bind_param_query_as, QueryBuilder};
use crate::filter::{Filter, SqlParam};

/// Per-entity persistence handle. Services receive one of these at
/// construction and never touch the pool directly.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find_many(&self, filter: Filter) -> Result<Vec<E>, DatabaseError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, DatabaseError>;

    async fn insert(&self, entity: E) -> Result<E, DatabaseError>;

    /// Rewrites every column of an existing row. A row that vanished since it
    /// was read comes back as `NotFound`.
    async fn update(&self, entity: E) -> Result<E, DatabaseError>;

    async fn delete(&self, id: &str) -> Result<(), DatabaseError>;

    async fn find_404(&self, id: &str) -> Result<E, DatabaseError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<E>())
    }
}

pub fn not_found<E: Entity>() -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", E::KIND))
}

pub struct PgRepository<E> {
    pool: PgPool,
    _phantom: PhantomData<E>,
}

impl<E: Entity> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for PgRepository<E> {
    async fn find_many(&self, filter: Filter) -> Result<Vec<E>, DatabaseError> {
        let sql_result = filter.to_sql(E::TABLE)?;
        tracing::debug!(table = E::TABLE, query = %sql_result.query, "select");

        let mut q = sqlx::query_as::<_, E>(&sql_result.query);
        for p in sql_result.params {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, DatabaseError> {
        let sql_result = QueryBuilder::new(E::TABLE)?.select_by_id(id);
        let mut q = sqlx::query_as::<_, E>(&sql_result.query);
        for p in sql_result.params {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_optional(&self.pool).await?)
    }

    async fn insert(&self, entity: E) -> Result<E, DatabaseError> {
        let mut columns = vec![
            ("id", SqlParam::from(entity.id())),
            ("created_at", SqlParam::from(entity.created_at())),
        ];
        columns.extend(entity.columns());

        let sql_result = QueryBuilder::new(E::TABLE)?.insert(columns)?;
        let mut q = sqlx::query_as::<_, E>(&sql_result.query);
        for p in sql_result.params {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_one(&self.pool).await?)
    }

    async fn update(&self, entity: E) -> Result<E, DatabaseError> {
        let sql_result = QueryBuilder::new(E::TABLE)?.update(entity.id(), entity.columns())?;
        let mut q = sqlx::query_as::<_, E>(&sql_result.query);
        for p in sql_result.params {
            q = bind_param_query_as(q, p);
        }
        q.fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found::<E>())
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let sql_result = QueryBuilder::new(E::TABLE)?.delete(id);
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params {
            q = bind_param_query(q, p);
        }
        let result = q.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<E>());
        }
        Ok(())
    }
}
