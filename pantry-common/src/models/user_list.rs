use diesel::{Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};

use crate::schema::user_lists;

/// Materialized membership of a user in a list. Created for the creator at
/// list creation and for a recipient when an invitation is accepted; removed
/// only when the list itself is deleted.
#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable, QueryableByName)]
#[diesel(table_name = user_lists)]
#[diesel(primary_key(user_google_id, list_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserList {
    pub user_google_id: String,
    pub list_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUserList<'a> {
    pub user_google_id: &'a str,
    pub list_id: i32,
}
