use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A person that can be identified by face.
///
/// `id` doubles as the leading token of the person's reference photo names.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub full_name: String,
    pub role: String,
}

impl ActiveModelBehavior for ActiveModel {}
