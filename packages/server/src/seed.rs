use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::info;

use crate::entity::user;

/// Profiles seeded on startup: `(id, full name, role)`.
pub const DEFAULT_PROFILES: &[(i64, &str, &str)] = &[
    (10000000, "Гырдымов Антон Вячеславович", "CEO"),
    (10000001, "Кочанова Юлия Вадимовна", "Менеджер"),
    (10000002, "Сидорова Анна Михайловна", "Аналитик"),
];

/// Upsert the default profiles into the `user` table.
///
/// Safe to run on every start: existing rows are overwritten with the seed
/// values, rows outside the seed list are left alone.
pub async fn seed_profiles(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut upserted = 0u32;
    for &(id, full_name, role) in DEFAULT_PROFILES {
        let model = user::ActiveModel {
            id: Set(id),
            full_name: Set(full_name.to_string()),
            role: Set(role.to_string()),
        };

        user::Entity::insert(model)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([user::Column::FullName, user::Column::Role])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        upserted += 1;
    }

    info!("Seeded {} profiles", upserted);

    Ok(())
}
