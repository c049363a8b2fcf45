use actix_web::{web, HttpResponse};
use pantry_common::db::{self, DaoError, DbAsyncPool};
use pantry_common::messages::{ItemData, ListRename, ListSummary, NewItemData, NewListName};
use std::borrow::Cow;

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::middleware::identity::VerifiedIdentity;

const MAX_LIST_NAME_LENGTH: usize = 255;
const MAX_ITEM_NAME_LENGTH: usize = 255;

pub async fn create_list(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    new_list: web::Json<NewListName>,
) -> Result<HttpResponse, HttpErrorResponse> {
    validate_name(&new_list.name, MAX_LIST_NAME_LENGTH, "List name")?;

    let list_dao = db::list::Dao::new(&db_async_pool);

    // The unique (name, creator) index is the arbiter of name collisions, so
    // concurrent creates cannot both slip past a pre-check
    let list = match list_dao.create_list(&new_list.name, &identity.google_id).await {
        Ok(l) => l,
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(Cow::Borrowed(
                "You already have a list with that name",
            )));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("User has not been provisioned"),
                DoesNotExistType::User,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to create list",
            )));
        }
    };

    Ok(HttpResponse::Created().json(list))
}

pub async fn rename_list(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    rename: web::Json<ListRename>,
) -> Result<HttpResponse, HttpErrorResponse> {
    validate_name(&rename.new_name, MAX_LIST_NAME_LENGTH, "List name")?;

    let list_dao = db::list::Dao::new(&db_async_pool);

    match list_dao
        .rename_list(rename.list_id, &identity.google_id, &rename.new_name)
        .await
    {
        Ok(()) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No list you created has that ID"),
                DoesNotExistType::List,
            ));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(Cow::Borrowed(
                "You already have a list with that name",
            )));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to rename list",
            )));
        }
    }

    Ok(HttpResponse::Ok().finish())
}

pub async fn get_all_lists(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
) -> Result<HttpResponse, HttpErrorResponse> {
    let list_dao = db::list::Dao::new(&db_async_pool);

    let created = match list_dao.get_lists_created_by(&identity.google_id).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get lists",
            )));
        }
    };

    let summaries: Vec<ListSummary> = created.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(summaries))
}

pub async fn get_member_of_lists(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
) -> Result<HttpResponse, HttpErrorResponse> {
    let list_dao = db::list::Dao::new(&db_async_pool);

    let member_of = match list_dao.get_lists_with_member(&identity.google_id).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get lists",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(member_of))
}

pub async fn get_list(
    db_async_pool: web::Data<DbAsyncPool>,
    _identity: VerifiedIdentity,
    list_id: web::Path<i32>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let list_dao = db::list::Dao::new(&db_async_pool);

    let list = match list_dao.get_list_by_id(*list_id).await {
        Ok(l) => l,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No list has that ID"),
                DoesNotExistType::List,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get list",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(list))
}

pub async fn delete_list(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    list_id: web::Path<i32>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let list_dao = db::list::Dao::new(&db_async_pool);

    match list_dao.delete_list(*list_id, &identity.google_id).await {
        Ok(()) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No list you created has that ID"),
                DoesNotExistType::List,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to delete list",
            )));
        }
    }

    Ok(HttpResponse::Ok().finish())
}

pub async fn create_item(
    db_async_pool: web::Data<DbAsyncPool>,
    identity: VerifiedIdentity,
    list_id: web::Path<i32>,
    new_item: web::Json<NewItemData>,
) -> Result<HttpResponse, HttpErrorResponse> {
    validate_name(&new_item.name, MAX_ITEM_NAME_LENGTH, "Item name")?;

    let list_dao = db::list::Dao::new(&db_async_pool);

    let item = match list_dao
        .create_item(
            *list_id,
            &new_item.name,
            new_item.generic,
            new_item.priority,
            &identity.google_id,
        )
        .await
    {
        Ok(i) => i,
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No list has that ID"),
                DoesNotExistType::List,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to create item",
            )));
        }
    };

    Ok(HttpResponse::Created().json(ItemData::from(item)))
}

pub async fn get_items(
    db_async_pool: web::Data<DbAsyncPool>,
    _identity: VerifiedIdentity,
    list_id: web::Path<i32>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let list_dao = db::list::Dao::new(&db_async_pool);

    let items = match list_dao.get_items(*list_id).await {
        Ok(i) => i,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to get items",
            )));
        }
    };

    let items: Vec<ItemData> = items.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(items))
}

pub async fn delete_item(
    db_async_pool: web::Data<DbAsyncPool>,
    _identity: VerifiedIdentity,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let (list_id, item_id) = path.into_inner();
    let list_dao = db::list::Dao::new(&db_async_pool);

    match list_dao.delete_item(item_id, list_id).await {
        Ok(()) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                Cow::Borrowed("No item on that list has that ID"),
                DoesNotExistType::Item,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(Cow::Borrowed(
                "Failed to delete item",
            )));
        }
    }

    Ok(HttpResponse::Ok().finish())
}

fn validate_name(
    name: &str,
    max_length: usize,
    what: &'static str,
) -> Result<(), HttpErrorResponse> {
    if name.trim().is_empty() {
        return Err(HttpErrorResponse::IncorrectlyFormed(
            format!("{what} must not be empty").into(),
        ));
    }

    if name.len() > max_length {
        return Err(HttpErrorResponse::InputTooLarge(
            format!("{what} is too long").into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pantry_common::messages::{
        ItemData, ListRename, ListSummary, ListWithMembers, NewItemData, NewListName,
    };
    use pantry_common::models::item::ItemPriority;

    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};

    use crate::handlers::test_utils;
    use crate::middleware::identity::IDENTITY_HEADER;

    #[actix_web::test]
    async fn test_create_and_get_list() {
        let app = test_utils::test_app().await;
        let google_id = test_utils::unique_google_id();
        test_utils::provision_user(&app, &google_id).await;

        let list = test_utils::create_list(&app, &google_id).await;
        assert_eq!(list.created_by_google_id, google_id);
        assert_eq!(list.members.len(), 1);

        let req = TestRequest::get()
            .uri(&format!("/api/list/{}", list.id))
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: ListWithMembers = test_utils::body_json(resp).await;
        assert_eq!(fetched.name, list.name);

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&google_id).await;
    }

    #[actix_web::test]
    async fn test_duplicate_list_name_is_a_conflict() {
        let app = test_utils::test_app().await;
        let google_id = test_utils::unique_google_id();
        test_utils::provision_user(&app, &google_id).await;

        let name = test_utils::unique_list_name();

        let req = TestRequest::post()
            .uri("/api/list")
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .set_json(&NewListName { name: name.clone() })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let list: ListWithMembers = test_utils::body_json(resp).await;

        let req = TestRequest::post()
            .uri("/api/list")
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .set_json(&NewListName { name })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&google_id).await;
    }

    #[actix_web::test]
    async fn test_empty_list_name_is_rejected() {
        let app = test_utils::test_app().await;
        let google_id = test_utils::unique_google_id();
        test_utils::provision_user(&app, &google_id).await;

        let req = TestRequest::post()
            .uri("/api/list")
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .set_json(&NewListName {
                name: String::from("   "),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        test_utils::clean_up_user(&google_id).await;
    }

    #[actix_web::test]
    async fn test_rename_list() {
        let app = test_utils::test_app().await;
        let google_id = test_utils::unique_google_id();
        test_utils::provision_user(&app, &google_id).await;
        let list = test_utils::create_list(&app, &google_id).await;

        let new_name = test_utils::unique_list_name();
        let req = TestRequest::put()
            .uri("/api/list")
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .set_json(&ListRename {
                list_id: list.id,
                new_name: new_name.clone(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::get()
            .uri(&format!("/api/list/{}", list.id))
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let fetched: ListWithMembers = test_utils::body_json(resp).await;
        assert_eq!(fetched.name, new_name);

        // Renaming someone else's list is a 404, not a silent no-op
        let stranger_id = test_utils::unique_google_id();
        test_utils::provision_user(&app, &stranger_id).await;
        let req = TestRequest::put()
            .uri("/api/list")
            .insert_header((IDENTITY_HEADER, stranger_id.as_str()))
            .set_json(&ListRename {
                list_id: list.id,
                new_name: String::from("hijacked"),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&google_id).await;
        test_utils::clean_up_user(&stranger_id).await;
    }

    #[actix_web::test]
    async fn test_all_and_member_of_views() {
        let app = test_utils::test_app().await;
        let google_id = test_utils::unique_google_id();
        test_utils::provision_user(&app, &google_id).await;

        let first = test_utils::create_list(&app, &google_id).await;
        let second = test_utils::create_list(&app, &google_id).await;

        let req = TestRequest::get()
            .uri("/api/list/all")
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let created: Vec<ListSummary> = test_utils::body_json(resp).await;
        assert_eq!(created.len(), 2);

        let req = TestRequest::get()
            .uri("/api/list/member_of")
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let member_of: Vec<ListWithMembers> = test_utils::body_json(resp).await;
        assert_eq!(member_of.len(), 2);

        test_utils::clean_up_list(first.id).await;
        test_utils::clean_up_list(second.id).await;
        test_utils::clean_up_user(&google_id).await;
    }

    #[actix_web::test]
    async fn test_item_routes() {
        let app = test_utils::test_app().await;
        let google_id = test_utils::unique_google_id();
        test_utils::provision_user(&app, &google_id).await;
        let list = test_utils::create_list(&app, &google_id).await;

        let req = TestRequest::post()
            .uri(&format!("/api/list/{}/item", list.id))
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .set_json(&NewItemData {
                name: String::from("Olive oil"),
                generic: false,
                priority: ItemPriority::High,
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let item: ItemData = test_utils::body_json(resp).await;
        assert_eq!(item.name, "Olive oil");
        assert_eq!(item.priority, ItemPriority::High);

        let req = TestRequest::get()
            .uri(&format!("/api/list/{}/item", list.id))
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let items: Vec<ItemData> = test_utils::body_json(resp).await;
        assert_eq!(items.len(), 1);

        let req = TestRequest::delete()
            .uri(&format!("/api/list/{}/item/{}", list.id, item.id))
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::delete()
            .uri(&format!("/api/list/{}/item/{}", list.id, item.id))
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        test_utils::clean_up_list(list.id).await;
        test_utils::clean_up_user(&google_id).await;
    }

    #[actix_web::test]
    async fn test_delete_list_requires_creator() {
        let app = test_utils::test_app().await;
        let google_id = test_utils::unique_google_id();
        let stranger_id = test_utils::unique_google_id();
        test_utils::provision_user(&app, &google_id).await;
        test_utils::provision_user(&app, &stranger_id).await;
        let list = test_utils::create_list(&app, &google_id).await;

        let req = TestRequest::delete()
            .uri(&format!("/api/list/{}", list.id))
            .insert_header((IDENTITY_HEADER, stranger_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = TestRequest::delete()
            .uri(&format!("/api/list/{}", list.id))
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::get()
            .uri(&format!("/api/list/{}", list.id))
            .insert_header((IDENTITY_HEADER, google_id.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        test_utils::clean_up_user(&google_id).await;
        test_utils::clean_up_user(&stranger_id).await;
    }
}
