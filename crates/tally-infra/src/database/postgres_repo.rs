//! PostgreSQL vote store.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, SqlErr};

use tally_core::domain::{NewVote, PostId, UserId, Vote, VoteId, VoteValue};
use tally_core::error::RepoError;
use tally_core::ports::VoteRepository;

use super::entity::vote::{self, Entity as VoteEntity};

/// PostgreSQL vote repository.
pub struct PostgresVoteRepository {
    db: DbConn,
}

impl PostgresVoteRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => match err {
            DbErr::Conn(e) => RepoError::Connection(e.to_string()),
            other => RepoError::Query(other.to_string()),
        },
    }
}

fn into_votes(models: Vec<vote::Model>) -> Result<Vec<Vote>, RepoError> {
    models.into_iter().map(Vote::try_from).collect()
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn find_for_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Vec<Vote>, RepoError> {
        tracing::debug!(post_id, user_id = %user_id, "Finding user vote");

        let models = VoteEntity::find()
            .filter(vote::Column::PostId.eq(post_id))
            .filter(vote::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        into_votes(models)
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Vote>, RepoError> {
        let models = VoteEntity::find()
            .filter(vote::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        into_votes(models)
    }

    async fn insert(&self, vote: NewVote) -> Result<Vote, RepoError> {
        let model = vote::ActiveModel::from(vote)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(vote_id = model.id, post_id = model.post_id, "Vote inserted");
        Vote::try_from(model)
    }

    async fn update_value(&self, id: VoteId, value: VoteValue) -> Result<(), RepoError> {
        let result = VoteEntity::update_many()
            .col_expr(vote::Column::Vote, Expr::value(value.as_i16()))
            .filter(vote::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(vote_id = id, vote = value.as_i16(), "Vote updated");
        Ok(())
    }

    async fn delete(&self, id: VoteId) -> Result<(), RepoError> {
        let result = VoteEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(vote_id = id, "Vote deleted");
        Ok(())
    }
}
