use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::tokenizer::TokenizeError;
use crate::ui::templates;

/// Failures that abort a single request. History is never touched when one of these is returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("please enter a sentence")]
    MissingInput,
    #[error("tokenizer failure: {0}")]
    Tokenizer(#[from] TokenizeError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Text that is safe to show to the user. Server-side details stay in the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::MissingInput => "Please enter a sentence to tokenize.",
            AppError::Tokenizer(_) | AppError::Internal(_) => {
                "Something went wrong while processing your sentence. Please try again."
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingInput => StatusCode::BAD_REQUEST,
            AppError::Tokenizer(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(templates::render_error_page(self.user_message()))
    }
}
