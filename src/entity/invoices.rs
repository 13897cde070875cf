use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub amount: f64,
    pub customer_id: Option<Uuid>,
    pub cbte_tipo: Option<i32>,
    pub pto_vta: Option<i32>,
    pub concepto: Option<i32>,
    pub doc_tipo: Option<i32>,
    pub doc_nro: Option<String>,
    pub imp_neto: Option<f64>,
    pub imp_iva: Option<f64>,
    pub imp_total: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(has_many = "super::invoice_products::Entity")]
    InvoiceProducts,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::invoice_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
