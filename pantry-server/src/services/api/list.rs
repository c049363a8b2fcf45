use actix_web::web::*;

use crate::handlers::list;

pub fn configure(cfg: &mut ServiceConfig) {
    // Fixed segments are registered before the `{list_id}` matcher so
    // `/list/all` never parses as a list ID
    cfg.service(
        scope("/list")
            .service(
                resource("")
                    .route(post().to(list::create_list))
                    .route(put().to(list::rename_list)),
            )
            .service(resource("/all").route(get().to(list::get_all_lists)))
            .service(resource("/member_of").route(get().to(list::get_member_of_lists)))
            .service(
                resource("/{list_id}")
                    .route(get().to(list::get_list))
                    .route(delete().to(list::delete_list)),
            )
            .service(
                resource("/{list_id}/item")
                    .route(post().to(list::create_item))
                    .route(get().to(list::get_items)),
            )
            .service(resource("/{list_id}/item/{item_id}").route(delete().to(list::delete_item))),
    );
}
