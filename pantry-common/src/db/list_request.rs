use diesel::{dsl, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use std::time::SystemTime;

use crate::db::list::attach_members;
use crate::db::{DaoError, DbAsyncPool};
use crate::messages::ListRequestWithList;
use crate::models::list::List;
use crate::models::list_request::{ListRequest, NewListRequest, RequestStatus};
use crate::models::user_list::NewUserList;

use crate::schema::list_requests as list_request_fields;
use crate::schema::list_requests::dsl::list_requests;
use crate::schema::lists::dsl::lists;
use crate::schema::user_lists::dsl::user_lists;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn create_request(
        &self,
        list_id: i32,
        from_user_google_id: &str,
        to_user_google_id: &str,
    ) -> Result<ListRequest, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let current_time = SystemTime::now();
        let new_request = NewListRequest {
            from_user_google_id,
            to_user_google_id,
            list_id,
            status: RequestStatus::Pending,
            created_timestamp: current_time,
            modified_timestamp: current_time,
        };

        let request = dsl::insert_into(list_requests)
            .values(&new_request)
            .get_result::<ListRequest>(&mut conn)
            .await?;

        Ok(request)
    }

    /// Accepts a pending invitation. The status flip and the recipient's
    /// membership row are written in one transaction; if either write fails,
    /// neither sticks. An invitation that exists but is no longer pending
    /// yields [`DaoError::InvalidTransition`].
    pub async fn accept_request(
        &self,
        list_id: i32,
        from_user_google_id: &str,
        to_user_google_id: &str,
    ) -> Result<ListRequest, DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        let request = db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    let updated = dsl::update(
                        list_requests
                            .find((from_user_google_id, to_user_google_id, list_id))
                            .filter(list_request_fields::status.eq(RequestStatus::Pending)),
                    )
                    .set((
                        list_request_fields::status.eq(RequestStatus::Accepted),
                        list_request_fields::modified_timestamp.eq(dsl::now),
                    ))
                    .get_result::<ListRequest>(conn)
                    .await
                    .optional()?;

                    let Some(request) = updated else {
                        return Err(non_pending_error(
                            conn,
                            list_id,
                            from_user_google_id,
                            to_user_google_id,
                        )
                        .await);
                    };

                    let membership = NewUserList {
                        user_google_id: to_user_google_id,
                        list_id,
                    };

                    dsl::insert_into(user_lists)
                        .values(&membership)
                        .execute(conn)
                        .await?;

                    Ok(request)
                })
            })
            .await?;

        Ok(request)
    }

    /// Declines a pending invitation. The row is kept with `rejected` status
    /// so the sender can see the outcome.
    pub async fn decline_request(
        &self,
        list_id: i32,
        from_user_google_id: &str,
        to_user_google_id: &str,
    ) -> Result<ListRequest, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let updated = dsl::update(
            list_requests
                .find((from_user_google_id, to_user_google_id, list_id))
                .filter(list_request_fields::status.eq(RequestStatus::Pending)),
        )
        .set((
            list_request_fields::status.eq(RequestStatus::Rejected),
            list_request_fields::modified_timestamp.eq(dsl::now),
        ))
        .get_result::<ListRequest>(&mut conn)
        .await
        .optional()?;

        match updated {
            Some(request) => Ok(request),
            None => Err(non_pending_error(
                &mut conn,
                list_id,
                from_user_google_id,
                to_user_google_id,
            )
            .await),
        }
    }

    /// Removes an invitation the sender previously extended. Works for
    /// pending and rejected invitations; an accepted invitation already
    /// granted a membership and cannot be quietly unwound here.
    pub async fn remove_sent_request(
        &self,
        list_id: i32,
        from_user_google_id: &str,
        to_user_google_id: &str,
    ) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let affected_row_count = diesel::delete(
            list_requests
                .find((from_user_google_id, to_user_google_id, list_id))
                .filter(list_request_fields::status.ne(RequestStatus::Accepted)),
        )
        .execute(&mut conn)
        .await?;

        if affected_row_count == 0 {
            let current = list_requests
                .find((from_user_google_id, to_user_google_id, list_id))
                .get_result::<ListRequest>(&mut conn)
                .await
                .optional()?;

            return Err(match current {
                Some(_) => DaoError::InvalidTransition,
                None => DaoError::QueryFailure(diesel::result::Error::NotFound),
            });
        }

        Ok(())
    }

    /// All invitations addressed to a user, whatever their status, each
    /// joined with the list they would grant access to.
    pub async fn get_requests_for_recipient(
        &self,
        to_user_google_id: &str,
    ) -> Result<Vec<ListRequestWithList>, DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        let incoming = db_connection
            .build_transaction()
            .read_only()
            .run::<_, diesel::result::Error, _>(|conn| {
                Box::pin(async move {
                    let addressed = list_requests
                        .inner_join(lists)
                        .filter(list_request_fields::to_user_google_id.eq(to_user_google_id))
                        .order(list_request_fields::created_timestamp.asc())
                        .load::<(ListRequest, List)>(conn)
                        .await?;

                    let mut incoming = Vec::with_capacity(addressed.len());
                    for (request, list) in addressed {
                        incoming.push(ListRequestWithList {
                            request: request.into(),
                            list: attach_members(conn, list).await?,
                        });
                    }

                    Ok(incoming)
                })
            })
            .await?;

        Ok(incoming)
    }

    pub async fn get_requests_for_list(&self, list_id: i32) -> Result<Vec<ListRequest>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let requests = list_requests
            .filter(list_request_fields::list_id.eq(list_id))
            .order(list_request_fields::created_timestamp.asc())
            .load::<ListRequest>(&mut conn)
            .await?;

        Ok(requests)
    }
}

// Distinguishes a missing invitation from one whose status forbids the
// attempted transition
async fn non_pending_error(
    conn: &mut diesel_async::AsyncPgConnection,
    list_id: i32,
    from_user_google_id: &str,
    to_user_google_id: &str,
) -> DaoError {
    let current = list_requests
        .find((from_user_google_id, to_user_google_id, list_id))
        .get_result::<ListRequest>(conn)
        .await
        .optional();

    match current {
        Ok(Some(_)) => DaoError::InvalidTransition,
        Ok(None) => DaoError::QueryFailure(diesel::result::Error::NotFound),
        Err(e) => DaoError::QueryFailure(e),
    }
}
