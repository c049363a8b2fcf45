use actix_web::web::*;

mod health;
mod list;
mod list_request;
mod user;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/api")
            .configure(health::configure)
            .configure(list::configure)
            .configure(list_request::configure)
            .configure(user::configure),
    );
}
