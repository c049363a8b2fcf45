use actix_web::web::*;

use crate::handlers::list_request;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/list_request")
            .service(
                resource("")
                    .route(post().to(list_request::create_request))
                    .route(delete().to(list_request::remove_sent_request)),
            )
            .service(resource("/accept").route(put().to(list_request::accept_request)))
            .service(resource("/decline").route(put().to(list_request::decline_request)))
            .service(resource("/revoke").route(delete().to(list_request::revoke_request)))
            .service(resource("/incoming").route(get().to(list_request::get_incoming_requests)))
            .service(
                resource("/for_list/{list_id}")
                    .route(get().to(list_request::get_requests_for_list)),
            ),
    );
}
