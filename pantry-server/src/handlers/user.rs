use actix_web::{web, HttpResponse};
use pantry_common::db::{self, DaoError, DbAsyncPool};
use pantry_common::friendcode::Generator;
use pantry_common::messages::{NewUserProfile, UserProfile};
use std::borrow::Cow;

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::middleware::identity::VerifiedIdentity;

const MAX_NAME_LENGTH: usize = 255;
const MAX_AVATAR_URL_LENGTH: usize = 2048;

/// Provisions a user record for the authenticated caller. Provisioning is
/// idempotent; a caller who already has a record gets it back unchanged.
pub async fn create_user(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    profile: web::Json<NewUserProfile>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let name_too_long = [&profile.first_name, &profile.last_name]
        .into_iter()
        .flatten()
        .any(|n| n.len() > MAX_NAME_LENGTH);

    if name_too_long {
        return Err(HttpErrorResponse::InputTooLarge(Cow::Borrowed(
            "Name is too long",
        )));
    }

    if profile.avatar_url.len() > MAX_AVATAR_URL_LENGTH {
        return Err(HttpErrorResponse::InputTooLarge(Cow::Borrowed(
            "Avatar URL is too long",
        )));
    }

    let user_dao = db::user::Dao::new(&db_async_pool);

    match user_dao.get_user(&identity.google_id).await {
        Ok(existing) => return Ok(HttpResponse::Ok().json(UserProfile::from(existing))),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => (),
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to check for existing user",
            )));
        }
    }

    let user = match user_dao
        .create_user(
            &identity.google_id,
            profile.first_name.as_deref(),
            profile.last_name.as_deref(),
            &profile.avatar_url,
            &Generator::default(),
        )
        .await
    {
        Ok(u) => u,
        Err(DaoError::RetriesExhausted(_)) => {
            log::error!(
                "Friendcode generation exhausted its retry budget for user {}",
                identity.google_id,
            );
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to generate an unused friendcode",
            )));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(Cow::Borrowed(
                "User was created concurrently",
            )));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to create user",
            )));
        }
    };

    Ok(HttpResponse::Created().json(UserProfile::from(user)))
}

pub async fn get_current_user(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = db::user::Dao::new(&db_async_pool);

    let user = match user_dao.get_user(&identity.google_id).await {
        Ok(u) => u,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("User has not been provisioned"),
                DoesNotExistType::User,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get user",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

pub async fn get_all_users(
    db_async_pool: web::Data<DbAsyncPool>,
    _identity: VerifiedIdentity,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = db::user::Dao::new(&db_async_pool);

    let users = match user_dao.get_all_users().await {
        Ok(u) => u,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get users",
            )));
        }
    };

    let profiles: Vec<UserProfile> = users.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(profiles))
}

pub async fn get_user_by_friendcode(
    db_async_pool: web::Data<DbAsyncPool>,
    _identity: VerifiedIdentity,
    friendcode: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = db::user::Dao::new(&db_async_pool);

    let user = match user_dao.get_user_by_friendcode(&friendcode).await {
        Ok(u) => u,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No user has that friendcode"),
                DoesNotExistType::User,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get user",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}
