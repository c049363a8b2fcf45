use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::SystemTime;

use crate::schema::items;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum ItemPriority {
    Low,
    Normal,
    High,
}

impl ItemPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemPriority::Low => "low",
            ItemPriority::Normal => "normal",
            ItemPriority::High => "high",
        }
    }
}

impl ToSql<Text, Pg> for ItemPriority {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for ItemPriority {
    fn from_sql(value: PgValue) -> deserialize::Result<Self> {
        match value.as_bytes() {
            b"low" => Ok(ItemPriority::Low),
            b"normal" => Ok(ItemPriority::Normal),
            b"high" => Ok(ItemPriority::High),
            other => Err(format!("Unrecognized item priority: {:?}", other).into()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Item {
    pub id: i32,
    pub list_id: i32,
    pub name: String,
    pub generic: bool,
    pub priority: ItemPriority,
    pub created_by_google_id: String,
    pub created_timestamp: SystemTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewItem<'a> {
    pub list_id: i32,
    pub name: &'a str,
    pub generic: bool,
    pub priority: ItemPriority,
    pub created_by_google_id: &'a str,
    pub created_timestamp: SystemTime,
}
