//! Product entity (`gap_products`).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "gap_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Stable product code, used as the correlation part of file names.
    pub cc_id: String,
    /// Directory that receives this product's pages.
    pub product_folder_path: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::page_job::Entity")]
    PageJobs,
}

impl Related<super::page_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageJobs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
