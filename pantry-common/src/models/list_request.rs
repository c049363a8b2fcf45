use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::SystemTime;

use crate::schema::list_requests;

/// Lifecycle state of a list invitation.
///
/// `Pending` may transition to `Accepted` or `Rejected` through recipient
/// action. `Accepted` is terminal. `Rejected` requests can still be removed
/// by the original sender.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl ToSql<Text, Pg> for RequestStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for RequestStatus {
    fn from_sql(value: PgValue) -> deserialize::Result<Self> {
        match value.as_bytes() {
            b"pending" => Ok(RequestStatus::Pending),
            b"accepted" => Ok(RequestStatus::Accepted),
            b"rejected" => Ok(RequestStatus::Rejected),
            other => Err(format!("Unrecognized request status: {:?}", other).into()),
        }
    }
}

/// An invitation for a user to join a list, addressable only by its full
/// composite key (sender, recipient, list).
#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = list_requests)]
#[diesel(primary_key(from_user_google_id, to_user_google_id, list_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ListRequest {
    pub from_user_google_id: String,
    pub to_user_google_id: String,
    pub list_id: i32,
    pub status: RequestStatus,
    pub created_timestamp: SystemTime,
    pub modified_timestamp: SystemTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = list_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewListRequest<'a> {
    pub from_user_google_id: &'a str,
    pub to_user_google_id: &'a str,
    pub list_id: i32,
    pub status: RequestStatus,
    pub created_timestamp: SystemTime,
    pub modified_timestamp: SystemTime,
}
