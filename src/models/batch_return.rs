use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Partial quantity received back against one dispatch.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "batch_returns")]
#[serde(rename_all = "camelCase")]
#[schema(as = BatchReturn)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Dispatch this batch belongs to. Not checked on write.
    #[sea_orm(indexed)]
    pub material_id: Uuid,
    pub received_quantity: f64,
    pub received_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material_dispatch::Entity",
        from = "Column::MaterialId",
        to = "super::material_dispatch::Column::Id"
    )]
    MaterialDispatch,
}

impl Related<super::material_dispatch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialDispatch.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if insert {
            let now = Utc::now();
            if active_model.id.is_not_set() {
                active_model.id = Set(Uuid::new_v4());
            }
            if active_model.received_date.is_not_set() {
                active_model.received_date = Set(now);
            }
            active_model.created_at = Set(now);
        }
        Ok(active_model)
    }
}
