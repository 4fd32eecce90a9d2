use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use tracing::{error, instrument};

use crate::entity::user;
use crate::utils::filename::parse_reference_id;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The reference name does not start with a numeric identifier.
    #[error("invalid identifier in reference {reference:?}: {reason}")]
    Invalid { reference: String, reason: String },
    /// The identifier is well-formed but has no profile.
    #[error("no profile with id {0}")]
    NotFound(i64),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Map a matched reference photo to its stored profile.
#[instrument(skip(db))]
pub async fn resolve<C>(db: &C, reference: &str) -> Result<user::Model, ResolveError>
where
    C: ConnectionTrait,
{
    let id = parse_reference_id(reference).map_err(|e| {
        error!(reference, error = %e, "ID extraction error");
        ResolveError::Invalid {
            reference: reference.to_string(),
            reason: e.to_string(),
        }
    })?;

    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ResolveError::NotFound(id))
}
