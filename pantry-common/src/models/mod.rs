pub mod item;
pub mod list;
pub mod list_request;
pub mod user;
pub mod user_list;
