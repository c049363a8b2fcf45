pub mod health;
pub mod list;
pub mod list_request;
pub mod user;

pub mod error {
    use pantry_common::messages::{ErrorType, ServerErrorResponse};

    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use std::borrow::Cow;
    use std::fmt;

    #[derive(Debug)]
    pub enum DoesNotExistType {
        User,
        List,
        Invitation,
        Item,
    }

    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        IncorrectlyFormed(Cow<'static, str>),
        InvalidState(Cow<'static, str>),
        ConflictWithExisting(Cow<'static, str>),

        // 401
        IdentityMissing(Cow<'static, str>),

        // 404
        DoesNotExist(Cow<'static, str>, DoesNotExistType),

        // 413
        InputTooLarge(Cow<'static, str>),

        // 500
        InternalError(Cow<'static, str>),
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let server_error: ServerErrorResponse = self.into();
            write!(f, "{:?}", server_error)
        }
    }

    impl From<HttpErrorResponse> for ServerErrorResponse {
        fn from(resp: HttpErrorResponse) -> Self {
            (&resp).into()
        }
    }

    impl From<&HttpErrorResponse> for ServerErrorResponse {
        fn from(resp: &HttpErrorResponse) -> Self {
            match resp {
                // 400
                HttpErrorResponse::IncorrectlyFormed(msg) => ServerErrorResponse {
                    err_type: ErrorType::IncorrectlyFormed,
                    err_message: format!("Incorrectly formed request: {msg}"),
                },
                HttpErrorResponse::InvalidState(msg) => ServerErrorResponse {
                    err_type: ErrorType::InvalidState,
                    err_message: format!("Invalid state: {msg}"),
                },
                HttpErrorResponse::ConflictWithExisting(msg) => ServerErrorResponse {
                    err_type: ErrorType::ConflictWithExisting,
                    err_message: format!("Conflict with existing data: {msg}"),
                },

                // 401
                HttpErrorResponse::IdentityMissing(msg) => ServerErrorResponse {
                    err_type: ErrorType::IdentityMissing,
                    err_message: format!("Identity missing: {msg}"),
                },

                // 404
                HttpErrorResponse::DoesNotExist(msg, dne_type) => ServerErrorResponse {
                    err_type: match dne_type {
                        DoesNotExistType::User => ErrorType::UserDoesNotExist,
                        DoesNotExistType::List => ErrorType::ListDoesNotExist,
                        DoesNotExistType::Invitation => ErrorType::InvitationDoesNotExist,
                        DoesNotExistType::Item => ErrorType::ItemDoesNotExist,
                    },
                    err_message: format!("Does not exist: {msg}"),
                },

                // 413
                HttpErrorResponse::InputTooLarge(msg) => ServerErrorResponse {
                    err_type: ErrorType::InputTooLarge,
                    err_message: format!("Input is too long: {msg}"),
                },

                // 500
                HttpErrorResponse::InternalError(msg) => ServerErrorResponse {
                    err_type: ErrorType::InternalError,
                    err_message: format!("Internal error: {msg}"),
                },
            }
        }
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn error_response(&self) -> HttpResponse {
            HttpResponseBuilder::new(self.status_code()).json(ServerErrorResponse::from(self))
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                HttpErrorResponse::IncorrectlyFormed(_)
                | HttpErrorResponse::InvalidState(_)
                | HttpErrorResponse::ConflictWithExisting(_) => StatusCode::BAD_REQUEST,
                HttpErrorResponse::IdentityMissing(_) => StatusCode::UNAUTHORIZED,
                HttpErrorResponse::DoesNotExist(_, _) => StatusCode::NOT_FOUND,
                HttpErrorResponse::InputTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
                HttpErrorResponse::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl From<actix_web::error::BlockingError> for HttpErrorResponse {
        fn from(_err: actix_web::error::BlockingError) -> Self {
            HttpErrorResponse::InternalError(Cow::Borrowed("Actix thread pool failure"))
        }
    }
}
