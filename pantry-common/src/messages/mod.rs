//! Wire-level request and response records. These carry no behavior; the
//! presentation layer is responsible for everything beyond their shape.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::models::item::{Item, ItemPriority};
use crate::models::list::List;
use crate::models::list_request::{ListRequest, RequestStatus};
use crate::models::user::User;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    IncorrectlyFormed,
    InvalidState,
    ConflictWithExisting,
    IdentityMissing,
    UserDoesNotExist,
    ListDoesNotExist,
    InvitationDoesNotExist,
    ItemDoesNotExist,
    InputTooLarge,
    InternalError,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerErrorResponse {
    pub err_type: ErrorType,
    pub err_message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub google_id: String,
    pub friendcode: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: String,
    pub created_timestamp: SystemTime,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            google_id: user.google_id,
            friendcode: user.friendcode,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar_url: user.avatar_url,
            created_timestamp: user.created_timestamp,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewListName {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListRename {
    pub list_id: i32,
    pub new_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: i32,
    pub name: String,
    pub created_by_google_id: String,
    pub created_timestamp: SystemTime,
}

impl From<List> for ListSummary {
    fn from(list: List) -> Self {
        Self {
            id: list.id,
            name: list.name,
            created_by_google_id: list.created_by_google_id,
            created_timestamp: list.created_timestamp,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListWithMembers {
    pub id: i32,
    pub name: String,
    pub created_by_google_id: String,
    pub created_timestamp: SystemTime,
    pub members: Vec<UserProfile>,
}

/// Input for sending an invitation. The sender is the authenticated caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListInvitation {
    pub list_id: i32,
    pub to_user_google_id: String,
}

/// Input for accept/decline. The recipient is the authenticated caller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestDecision {
    pub list_id: i32,
    pub from_user_google_id: String,
}

/// Sender-side removal of an invitation previously extended to a would-be
/// member.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestRevocation {
    pub list_id: i32,
    pub member_id: String,
}

/// Sender-side removal of an invitation, addressed by recipient ID. Same
/// underlying operation as [`RequestRevocation`]; both call shapes are kept
/// for the two caller roles the API grew up with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentRequestRemoval {
    pub list_id: i32,
    pub to_user_google_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListRequestData {
    pub from_user_google_id: String,
    pub to_user_google_id: String,
    pub list_id: i32,
    pub status: RequestStatus,
    pub created_timestamp: SystemTime,
    pub modified_timestamp: SystemTime,
}

impl From<ListRequest> for ListRequestData {
    fn from(request: ListRequest) -> Self {
        Self {
            from_user_google_id: request.from_user_google_id,
            to_user_google_id: request.to_user_google_id,
            list_id: request.list_id,
            status: request.status,
            created_timestamp: request.created_timestamp,
            modified_timestamp: request.modified_timestamp,
        }
    }
}

/// An invitation joined with its list and that list's members, as shown in
/// notification panels.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListRequestWithList {
    pub request: ListRequestData,
    pub list: ListWithMembers,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewItemData {
    pub name: String,
    pub generic: bool,
    pub priority: ItemPriority,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemData {
    pub id: i32,
    pub list_id: i32,
    pub name: String,
    pub generic: bool,
    pub priority: ItemPriority,
    pub created_by_google_id: String,
    pub created_timestamp: SystemTime,
}

impl From<Item> for ItemData {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            list_id: item.list_id,
            name: item.name,
            generic: item.generic,
            priority: item.priority,
            created_by_google_id: item.created_by_google_id,
            created_timestamp: item.created_timestamp,
        }
    }
}
