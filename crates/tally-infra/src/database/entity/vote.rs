//! Vote entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use tally_core::domain::{NewVote, Vote, VoteValue};
use tally_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub post_id: i64,
    pub user_id: Uuid,
    pub vote: i16,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Vote.
///
/// Fails if the row holds a value the check constraint should have refused.
impl TryFrom<Model> for Vote {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let value = VoteValue::try_from(model.vote).map_err(|e| {
            RepoError::InvalidData(format!("vote {}: {}", model.id, e))
        })?;

        Ok(Self {
            id: model.id,
            post_id: model.post_id,
            user_id: model.user_id,
            value,
            created_at: model.created_at.into(),
        })
    }
}

/// Conversion from a new Domain Vote to SeaORM ActiveModel; the id is left to the database.
impl From<NewVote> for ActiveModel {
    fn from(vote: NewVote) -> Self {
        Self {
            id: NotSet,
            post_id: Set(vote.post_id),
            user_id: Set(vote.user_id),
            vote: Set(vote.value.as_i16()),
            created_at: Set(vote.created_at.into()),
        }
    }
}
