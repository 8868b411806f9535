use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Placeholder stored until the first wastage recompute.
pub const DEFAULT_WASTAGE: &str = "0.00";

/// Material sent to an external company.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "material_dispatches")]
#[serde(rename_all = "camelCase")]
#[schema(as = MaterialDispatch)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub material_name: String,
    pub to_company: String,
    pub given_quantity: f64,
    pub dispatch_date: DateTime<Utc>,
    /// Last persisted wastage percentage, two decimals. Reports recompute it.
    #[schema(example = "25.00")]
    pub wastage: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::batch_return::Entity")]
    BatchReturns,
}

impl Related<super::batch_return::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BatchReturns.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        let now = Utc::now();
        if insert {
            if active_model.id.is_not_set() {
                active_model.id = Set(Uuid::new_v4());
            }
            if active_model.wastage.is_not_set() {
                active_model.wastage = Set(DEFAULT_WASTAGE.to_string());
            }
            if active_model.dispatch_date.is_not_set() {
                active_model.dispatch_date = Set(now);
            }
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(now);
        Ok(active_model)
    }
}
