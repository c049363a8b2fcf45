use diesel::{dsl, ExpressionMethods, QueryDsl};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::time::SystemTime;

use crate::db::{DaoError, DbAsyncPool};
use crate::messages::ListWithMembers;
use crate::models::item::{Item, ItemPriority, NewItem};
use crate::models::list::{List, NewList};
use crate::models::user_list::NewUserList;

use crate::schema::items as item_fields;
use crate::schema::items::dsl::items;
use crate::schema::list_requests as list_request_fields;
use crate::schema::list_requests::dsl::list_requests;
use crate::schema::lists as list_fields;
use crate::schema::lists::dsl::lists;
use crate::schema::user_lists as user_list_fields;
use crate::schema::user_lists::dsl::user_lists;
use crate::schema::users::dsl::users;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    /// Creates a list and enrolls its creator as the first member. Both rows
    /// are written in one transaction so a list can never exist without its
    /// creator's membership.
    pub async fn create_list(
        &self,
        name: &str,
        creator_google_id: &str,
    ) -> Result<ListWithMembers, DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        let list = db_connection
            .build_transaction()
            .run::<_, diesel::result::Error, _>(|conn| {
                Box::pin(async move {
                    let new_list = NewList {
                        name,
                        created_by_google_id: creator_google_id,
                        created_timestamp: SystemTime::now(),
                    };

                    let list = dsl::insert_into(lists)
                        .values(&new_list)
                        .get_result::<List>(conn)
                        .await?;

                    let creator_membership = NewUserList {
                        user_google_id: creator_google_id,
                        list_id: list.id,
                    };

                    dsl::insert_into(user_lists)
                        .values(&creator_membership)
                        .execute(conn)
                        .await?;

                    let with_members = attach_members(conn, list).await?;

                    Ok(with_members)
                })
            })
            .await?;

        Ok(list)
    }

    pub async fn get_lists_created_by(
        &self,
        creator_google_id: &str,
    ) -> Result<Vec<List>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let created = lists
            .filter(list_fields::created_by_google_id.eq(creator_google_id))
            .order(list_fields::created_timestamp.asc())
            .load::<List>(&mut conn)
            .await?;

        Ok(created)
    }

    pub async fn get_lists_with_member(
        &self,
        member_google_id: &str,
    ) -> Result<Vec<ListWithMembers>, DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        let member_lists = db_connection
            .build_transaction()
            .read_only()
            .run::<_, diesel::result::Error, _>(|conn| {
                Box::pin(async move {
                    let memberships = user_lists
                        .inner_join(lists)
                        .filter(user_list_fields::user_google_id.eq(member_google_id))
                        .select(crate::schema::lists::all_columns)
                        .order(list_fields::created_timestamp.asc())
                        .load::<List>(conn)
                        .await?;

                    let mut member_lists = Vec::with_capacity(memberships.len());
                    for list in memberships {
                        member_lists.push(attach_members(conn, list).await?);
                    }

                    Ok(member_lists)
                })
            })
            .await?;

        Ok(member_lists)
    }

    pub async fn get_list_by_id(&self, list_id: i32) -> Result<ListWithMembers, DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        let list = db_connection
            .build_transaction()
            .read_only()
            .run::<_, diesel::result::Error, _>(|conn| {
                Box::pin(async move {
                    let list = lists.find(list_id).get_result::<List>(conn).await?;
                    attach_members(conn, list).await
                })
            })
            .await?;

        Ok(list)
    }

    pub async fn rename_list(
        &self,
        list_id: i32,
        creator_google_id: &str,
        new_name: &str,
    ) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let affected_row_count = dsl::update(
            lists
                .find(list_id)
                .filter(list_fields::created_by_google_id.eq(creator_google_id)),
        )
        .set(list_fields::name.eq(new_name))
        .execute(&mut conn)
        .await?;

        if affected_row_count == 0 {
            return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
        }

        Ok(())
    }

    /// Deletes a list and everything hanging off it. Memberships,
    /// invitations, and items go first so the list row's foreign keys are
    /// never dangling mid-transaction. Only the list's creator may delete it.
    pub async fn delete_list(
        &self,
        list_id: i32,
        creator_google_id: &str,
    ) -> Result<(), DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    diesel::delete(user_lists.filter(user_list_fields::list_id.eq(list_id)))
                        .execute(conn)
                        .await?;

                    diesel::delete(
                        list_requests.filter(list_request_fields::list_id.eq(list_id)),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(items.filter(item_fields::list_id.eq(list_id)))
                        .execute(conn)
                        .await?;

                    let affected_row_count = diesel::delete(
                        lists
                            .find(list_id)
                            .filter(list_fields::created_by_google_id.eq(creator_google_id)),
                    )
                    .execute(conn)
                    .await?;

                    if affected_row_count == 0 {
                        // Roll back the dependent-row deletes above
                        return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
                    }

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }

    pub async fn create_item(
        &self,
        list_id: i32,
        name: &str,
        generic: bool,
        priority: ItemPriority,
        creator_google_id: &str,
    ) -> Result<Item, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let new_item = NewItem {
            list_id,
            name,
            generic,
            priority,
            created_by_google_id: creator_google_id,
            created_timestamp: SystemTime::now(),
        };

        let item = dsl::insert_into(items)
            .values(&new_item)
            .get_result::<Item>(&mut conn)
            .await?;

        Ok(item)
    }

    pub async fn get_items(&self, list_id: i32) -> Result<Vec<Item>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let list_items = items
            .filter(item_fields::list_id.eq(list_id))
            .order(item_fields::created_timestamp.asc())
            .load::<Item>(&mut conn)
            .await?;

        Ok(list_items)
    }

    pub async fn delete_item(&self, item_id: i32, list_id: i32) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let affected_row_count = diesel::delete(
            items
                .find(item_id)
                .filter(item_fields::list_id.eq(list_id)),
        )
        .execute(&mut conn)
        .await?;

        if affected_row_count == 0 {
            return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
        }

        Ok(())
    }
}

pub(crate) async fn attach_members(
    conn: &mut AsyncPgConnection,
    list: List,
) -> Result<ListWithMembers, diesel::result::Error> {
    let members = user_lists
        .inner_join(users)
        .filter(user_list_fields::list_id.eq(list.id))
        .select(crate::schema::users::all_columns)
        .load::<crate::models::user::User>(conn)
        .await?;

    Ok(ListWithMembers {
        id: list.id,
        name: list.name,
        created_by_google_id: list.created_by_google_id,
        created_timestamp: list.created_timestamp,
        members: members.into_iter().map(Into::into).collect(),
    })
}
