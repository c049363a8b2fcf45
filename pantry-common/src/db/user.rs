use diesel::{dsl, ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use std::time::SystemTime;

use crate::db::{DaoError, DbAsyncPool};
use crate::friendcode::Generator;
use crate::models::user::{NewUser, User};

use crate::schema::users as user_fields;
use crate::schema::users::dsl::users;

/// Upper bound on friendcode candidates drawn from a [`Generator`] before a
/// `create_user` call gives up with [`DaoError::RetriesExhausted`].
pub const MAX_FRIENDCODE_ATTEMPTS: u32 = 32;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn get_user(&self, google_id: &str) -> Result<User, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let user = users.find(google_id).get_result::<User>(&mut conn).await?;

        Ok(user)
    }

    pub async fn get_user_by_friendcode(&self, friendcode: &str) -> Result<User, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let user = users
            .filter(user_fields::friendcode.eq(friendcode))
            .get_result::<User>(&mut conn)
            .await?;

        Ok(user)
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let all_users = users.load::<User>(&mut conn).await?;

        Ok(all_users)
    }

    /// Creates a user with a freshly-generated friendcode. Candidates that
    /// collide with an existing user's friendcode are discarded and resampled
    /// up to [`MAX_FRIENDCODE_ATTEMPTS`] times.
    pub async fn create_user(
        &self,
        google_id: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        avatar_url: &str,
        friendcode_generator: &Generator,
    ) -> Result<User, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let mut friendcode = None;

        for _ in 0..MAX_FRIENDCODE_ATTEMPTS {
            let candidate = friendcode_generator.sample();

            let candidate_taken = dsl::select(dsl::exists(
                users.filter(user_fields::friendcode.eq(&candidate)),
            ))
            .get_result::<bool>(&mut conn)
            .await?;

            if !candidate_taken {
                friendcode = Some(candidate);
                break;
            }
        }

        let Some(friendcode) = friendcode else {
            return Err(DaoError::RetriesExhausted(
                "could not find an unused friendcode",
            ));
        };

        let new_user = NewUser {
            google_id,
            friendcode: &friendcode,
            first_name,
            last_name,
            avatar_url,
            created_timestamp: SystemTime::now(),
        };

        let user = dsl::insert_into(users)
            .values(&new_user)
            .get_result::<User>(&mut conn)
            .await?;

        Ok(user)
    }
}
