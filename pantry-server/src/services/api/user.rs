use actix_web::web::*;

use crate::handlers::user;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/user")
            .service(
                resource("")
                    .route(post().to(user::create_user))
                    .route(get().to(user::get_current_user)),
            )
            .service(resource("/all").route(get().to(user::get_all_users)))
            .service(
                resource("/by_friendcode/{friendcode}")
                    .route(get().to(user::get_user_by_friendcode)),
            ),
    );
}
