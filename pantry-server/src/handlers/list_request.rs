use actix_web::{web, HttpResponse};
use pantry_common::db::{self, DaoError, DbAsyncPool};
use pantry_common::messages::{
    ListInvitation, ListRequestData, RequestDecision, RequestRevocation, SentRequestRemoval,
};
use std::borrow::Cow;

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::middleware::identity::VerifiedIdentity;

pub async fn create_request(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    invitation: web::Json<ListInvitation>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if invitation.to_user_google_id == identity.google_id {
        return Err(HttpErrorResponse::IncorrectlyFormed(Cow::Borrowed(
            "Cannot invite yourself to a list",
        )));
    }

    let request_dao = db::list_request::Dao::new(&db_async_pool);

    let request = match request_dao
        .create_request(
            invitation.list_id,
            &identity.google_id,
            &invitation.to_user_google_id,
        )
        .await
    {
        Ok(r) => r,
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(Cow::Borrowed(
                "An invitation for that user and list already exists",
            )));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("The list or the invited user does not exist"),
                DoesNotExistType::List,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to create invitation",
            )));
        }
    };

    Ok(HttpResponse::Created().json(ListRequestData::from(request)))
}

pub async fn accept_request(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    decision: web::Json<RequestDecision>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let request_dao = db::list_request::Dao::new(&db_async_pool);

    let request = match request_dao
        .accept_request(
            decision.list_id,
            &decision.from_user_google_id,
            &identity.google_id,
        )
        .await
    {
        Ok(r) => r,
        Err(DaoError::InvalidTransition) => {
            return Err(HttpErrorResponse::InvalidState(Cow::Borrowed(
                "Invitation is no longer pending",
            )));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No such invitation"),
                DoesNotExistType::Invitation,
            ));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(Cow::Borrowed(
                "You are already a member of that list",
            )));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to accept invitation",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(ListRequestData::from(request)))
}

pub async fn decline_request(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    decision: web::Json<RequestDecision>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let request_dao = db::list_request::Dao::new(&db_async_pool);

    let request = match request_dao
        .decline_request(
            decision.list_id,
            &decision.from_user_google_id,
            &identity.google_id,
        )
        .await
    {
        Ok(r) => r,
        Err(DaoError::InvalidTransition) => {
            return Err(HttpErrorResponse::InvalidState(Cow::Borrowed(
                "Invitation is no longer pending",
            )));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No such invitation"),
                DoesNotExistType::Invitation,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to decline invitation",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(ListRequestData::from(request)))
}

/// Sender-side withdrawal of an invitation, addressed by the would-be
/// member's ID. Same operation as [`remove_sent_request`]; the route shape
/// differs for historical clients.
pub async fn revoke_request(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    revocation: web::Json<RequestRevocation>,
) -> Result<HttpResponse, HttpErrorResponse> {
    remove_request(
        &db_async_pool,
        revocation.list_id,
        &identity.google_id,
        &revocation.member_id,
    )
    .await
}

pub async fn remove_sent_request(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    removal: web::Json<SentRequestRemoval>,
) -> Result<HttpResponse, HttpErrorResponse> {
    remove_request(
        &db_async_pool,
        removal.list_id,
        &identity.google_id,
        &removal.to_user_google_id,
    )
    .await
}

async fn remove_request(
    db_async_pool: &DbAsyncPool,
    list_id: i32,
    from_user_google_id: &str,
    to_user_google_id: &str,
) -> Result<HttpResponse, HttpErrorResponse> {
    let request_dao = db::list_request::Dao::new(db_async_pool);

    match request_dao
        .remove_sent_request(list_id, from_user_google_id, to_user_google_id)
        .await
    {
        Ok(()) => (),
        Err(DaoError::InvalidTransition) => {
            return Err(HttpErrorResponse::InvalidState(Cow::Borrowed(
                "An accepted invitation cannot be removed",
            )));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No such invitation"),
                DoesNotExistType::Invitation,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to remove invitation",
            )));
        }
    }

    Ok(HttpResponse::Ok().finish())
}

pub async fn get_incoming_requests(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
) -> Result<HttpResponse, HttpErrorResponse> {
    let request_dao = db::list_request::Dao::new(&db_async_pool);

    let incoming = match request_dao
        .get_requests_for_recipient(&identity.google_id)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get invitations",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(incoming))
}

pub async fn get_requests_for_list(
    db_async_pool: web::Data<DbAsyncPool>,
    _identity: VerifiedIdentity,
    list_id: web::Path<i32>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let request_dao = db::list_request::Dao::new(&db_async_pool);

    let requests = match request_dao.get_requests_for_list(*list_id).await {
        Ok(r) => r,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get invitations",
            )));
        }
    };

    let requests: Vec<ListRequestData> = requests.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(requests))
}

#[cfg(test)]
mod tests {
    use pantry_common::messages::{
        ListInvitation, ListRequestData, ListRequestWithList, ListWithMembers, RequestDecision,
        RequestRevocation, SentRequestRemoval,
    };
    use pantry_common::models::list_request::RequestStatus;

    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};

    use crate::handlers::test_utils;
    use crate::middleware::identity::IDENTITY_HEADER;

    async fn invite<S>(app: &S, list_id: i32, sender: &str, recipient: &str) -> StatusCode
    where
        S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
            Error = actix_web::Error,
        >,
    {
        let req = TestRequest::post()
            .uri("/api/list_request")
            .insert_header((IDENTITY_HEADER, sender))
            .set_json(&ListInvitation {
                list_id,
                to_user_google_id: String::from(recipient),
            })
            .to_request();
        test::call_service(app, req).await.status()
    }

    #[actix_web::test]
    async fn test_invite_accept_grants_membership() {
        let app = test_utils::test_app().await;
        let sender = test_utils::unique_google_id();
        let recipient = test_utils::unique_google_id();
        test_utils::provision_user(&app, &sender).await;
        test_utils::provision_user(&app, &recipient).await;
        let list = test_utils::create_list(&app, &sender).await;

        assert_eq!(
            invite(&app, list.id, &sender, &recipient).await,
            StatusCode::CREATED,
        );

        let req = TestRequest::get()
            .uri("/api/list_request/incoming")
            .insert_header((IDENTITY_HEADER, recipient.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let incoming: Vec<ListRequestWithList> = test_utils::body_json(resp).await;
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].list.id, list.id);

        let req = TestRequest::put()
            .uri("/api/list_request/accept")
            .insert_header((IDENTITY_HEADER, recipient.as_str()))
            .set_json(&RequestDecision {
                list_id: list.id,
                from_user_google_id: sender.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let accepted: ListRequestData = test_utils::body_json(resp).await;
        assert_eq!(accepted.status, RequestStatus::Accepted);

        let req = TestRequest::get()
            .uri(&format!("/api/list/{}", list.id))
            .insert_header((IDENTITY_HEADER, sender.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let fetched: ListWithMembers = test_utils::body_json(resp).await;
        assert_eq!(fetched.members.len(), 2);

        // Accepting twice is a state conflict
        let req = TestRequest::put()
            .uri("/api/list_request/accept")
            .insert_header((IDENTITY_HEADER, recipient.as_str()))
            .set_json(&RequestDecision {
                list_id: list.id,
                from_user_google_id: sender.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&sender).await;
        test_utils::clean_up_user(&recipient).await;
    }

    #[actix_web::test]
    async fn test_self_invite_and_duplicates_are_rejected() {
        let app = test_utils::test_app().await;
        let sender = test_utils::unique_google_id();
        let recipient = test_utils::unique_google_id();
        test_utils::provision_user(&app, &sender).await;
        test_utils::provision_user(&app, &recipient).await;
        let list = test_utils::create_list(&app, &sender).await;

        assert_eq!(
            invite(&app, list.id, &sender, &sender).await,
            StatusCode::BAD_REQUEST,
        );

        assert_eq!(
            invite(&app, list.id, &sender, &recipient).await,
            StatusCode::CREATED,
        );
        assert_eq!(
            invite(&app, list.id, &sender, &recipient).await,
            StatusCode::BAD_REQUEST,
        );

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&sender).await;
        test_utils::clean_up_user(&recipient).await;
    }

    #[actix_web::test]
    async fn test_decline_leaves_membership_unchanged() {
        let app = test_utils::test_app().await;
        let sender = test_utils::unique_google_id();
        let recipient = test_utils::unique_google_id();
        test_utils::provision_user(&app, &sender).await;
        test_utils::provision_user(&app, &recipient).await;
        let list = test_utils::create_list(&app, &sender).await;

        invite(&app, list.id, &sender, &recipient).await;

        let req = TestRequest::put()
            .uri("/api/list_request/decline")
            .insert_header((IDENTITY_HEADER, recipient.as_str()))
            .set_json(&RequestDecision {
                list_id: list.id,
                from_user_google_id: sender.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let declined: ListRequestData = test_utils::body_json(resp).await;
        assert_eq!(declined.status, RequestStatus::Rejected);

        let req = TestRequest::get()
            .uri(&format!("/api/list/{}", list.id))
            .insert_header((IDENTITY_HEADER, sender.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let fetched: ListWithMembers = test_utils::body_json(resp).await;
        assert_eq!(fetched.members.len(), 1);

        // The sender can still see the rejected invitation for the list
        let req = TestRequest::get()
            .uri(&format!("/api/list_request/for_list/{}", list.id))
            .insert_header((IDENTITY_HEADER, sender.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let for_list: Vec<ListRequestData> = test_utils::body_json(resp).await;
        assert_eq!(for_list.len(), 1);
        assert_eq!(for_list[0].status, RequestStatus::Rejected);

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&sender).await;
        test_utils::clean_up_user(&recipient).await;
    }

    #[actix_web::test]
    async fn test_both_removal_routes_delete_unaccepted_invitations() {
        let app = test_utils::test_app().await;
        let sender = test_utils::unique_google_id();
        let recipient = test_utils::unique_google_id();
        test_utils::provision_user(&app, &sender).await;
        test_utils::provision_user(&app, &recipient).await;
        let list = test_utils::create_list(&app, &sender).await;

        invite(&app, list.id, &sender, &recipient).await;

        let req = TestRequest::delete()
            .uri("/api/list_request/revoke")
            .insert_header((IDENTITY_HEADER, sender.as_str()))
            .set_json(&RequestRevocation {
                list_id: list.id,
                member_id: recipient.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        invite(&app, list.id, &sender, &recipient).await;

        let req = TestRequest::delete()
            .uri("/api/list_request")
            .insert_header((IDENTITY_HEADER, sender.as_str()))
            .set_json(&SentRequestRemoval {
                list_id: list.id,
                to_user_google_id: recipient.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Nothing left to remove
        let req = TestRequest::delete()
            .uri("/api/list_request")
            .insert_header((IDENTITY_HEADER, sender.as_str()))
            .set_json(&SentRequestRemoval {
                list_id: list.id,
                to_user_google_id: recipient.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&sender).await;
        test_utils::clean_up_user(&recipient).await;
    }

    #[actix_web::test]
    async fn test_accepted_invitation_cannot_be_removed() {
        let app = test_utils::test_app().await;
        let sender = test_utils::unique_google_id();
        let recipient = test_utils::unique_google_id();
        test_utils::provision_user(&app, &sender).await;
        test_utils::provision_user(&app, &recipient).await;
        let list = test_utils::create_list(&app, &sender).await;

        invite(&app, list.id, &sender, &recipient).await;

        let req = TestRequest::put()
            .uri("/api/list_request/accept")
            .insert_header((IDENTITY_HEADER, recipient.as_str()))
            .set_json(&RequestDecision {
                list_id: list.id,
                from_user_google_id: sender.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::delete()
            .uri("/api/list_request")
            .insert_header((IDENTITY_HEADER, sender.as_str()))
            .set_json(&SentRequestRemoval {
                list_id: list.id,
                to_user_google_id: recipient.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&sender).await;
        test_utils::clean_up_user(&recipient).await;
    }
}
