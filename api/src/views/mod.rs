//! Rendering: handler outcomes become JSON view contexts or redirects with a flash

mod dto;

pub use dto::{
    TweetFormResponse, TweetPageResponse, TweetResponse, TweetWithUserResponse, UserResponse,
};

use axum::Json;
use axum::http::{StatusCode, header::SET_COOKIE};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use crate::domain::validation::ValidationErrors;
use crate::services::cookies;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Notice,
    Alert,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Notice => "notice",
            FlashKind::Alert => "alert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "notice" => Some(FlashKind::Notice),
            "alert" => Some(FlashKind::Alert),
            _ => None,
        }
    }
}

/// One-shot status message carried across a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Notice,
            message: message.into(),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Alert,
            message: message.into(),
        }
    }
}

/// Named view templates and the data each one needs
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view")]
pub enum View {
    #[serde(rename = "tweets/index")]
    Index(TweetPageResponse),
    #[serde(rename = "tweets/show")]
    Show { tweet: TweetResponse },
    #[serde(rename = "tweets/new")]
    New {
        tweet: TweetFormResponse,
        errors: ValidationErrors,
    },
    #[serde(rename = "tweets/edit")]
    Edit {
        tweet: TweetResponse,
        errors: ValidationErrors,
    },
}

#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub view: View,
    pub flash: Option<Flash>,
}

/// What a tweet operation asks the HTTP layer to do
#[derive(Debug, Clone)]
pub enum Outcome {
    Render(Page),
    Redirect { to: &'static str, flash: Flash },
}

impl Outcome {
    pub fn render(view: View) -> Self {
        Outcome::Render(Page {
            status: StatusCode::OK,
            view,
            flash: None,
        })
    }

    /// Re-present a form after the store rejected the input
    pub fn rerender(view: View) -> Self {
        Outcome::Render(Page {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            view,
            flash: None,
        })
    }

    pub fn redirect(to: &'static str, notice: &str) -> Self {
        Outcome::Redirect {
            to,
            flash: Flash::notice(notice),
        }
    }

    /// Attach a pending flash to a rendered page. Redirects keep their own.
    pub fn with_flash(self, flash: Option<Flash>) -> Self {
        match self {
            Outcome::Render(page) => Outcome::Render(Page { flash, ..page }),
            redirect => redirect,
        }
    }
}

#[derive(Serialize)]
struct Rendered<'a> {
    #[serde(flatten)]
    view: &'a View,
    #[serde(skip_serializing_if = "Option::is_none")]
    flash: Option<&'a Flash>,
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Render(page) => {
                let body = Rendered {
                    view: &page.view,
                    flash: page.flash.as_ref(),
                };
                let mut response = (page.status, Json(body)).into_response();
                // A shown flash is consumed
                if page.flash.is_some() {
                    response
                        .headers_mut()
                        .append(SET_COOKIE, cookies::build_clear_flash_cookie());
                }
                response
            }
            Outcome::Redirect { to, flash } => match cookies::build_flash_cookie(&flash) {
                Ok(cookie) => {
                    let mut response = Redirect::to(to).into_response();
                    response.headers_mut().append(SET_COOKIE, cookie);
                    response
                }
                Err(status) => status.into_response(),
            },
        }
    }
}
