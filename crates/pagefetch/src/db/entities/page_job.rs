//! Page fetch job entity (`gap_product_data`).

use sea_orm::entity::prelude::*;

/// One row per product page to download within a fetch run.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "gap_product_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Fetch run (scope) the row was produced for.
    pub gap_data_fetch_id: i64,
    pub product_id: i64,
    /// Page to render; rows without one are never selected.
    pub product_page_url: Option<String>,
    /// Time-of-record token used in the stored file name.
    pub folder_timestamp: String,
    /// pending, succeeded or failed.
    #[sea_orm(default_value = "pending")]
    pub page_fetch_status: String,
    /// Where the rendered HTML was written, once succeeded.
    pub html_file_path: Option<String>,
    pub inserted_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
