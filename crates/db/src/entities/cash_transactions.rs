//! `SeaORM` Entity for cash_transactions table.
//!
//! Append-only money ledger. `affects_balance` records whether the
//! counterparty balance was actually moved when the row was written,
//! so reversal can apply exactly the inverse delta.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CashTransactionKind, CounterpartyKind, ReferenceType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: CashTransactionKind,
    /// Signed amount per the ledger convention.
    pub amount: Decimal,
    pub counterparty_kind: CounterpartyKind,
    pub counterparty_id: Uuid,
    pub reference_type: ReferenceType,
    pub reference_id: Uuid,
    /// Whether this row moved the counterparty's running balance.
    pub affects_balance: bool,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
