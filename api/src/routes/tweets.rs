//! Tweet resource endpoints (/tweets/*, /users/:user_id/tweets/*)

use axum::{
    Form, Router,
    extract::{Path, Query, State, rejection::FormRejection},
    routing::{get, patch, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies;
use crate::services::tweets::{self, TweetParams};
use crate::views::Outcome;
use super::auth::CurrentUser;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/tweets", get(index))
        .route("/tweets/new", get(new_tweet))
        .route("/tweets/{id}", get(show))
        .route("/users/{user_id}/tweets", post(create))
        .route(
            "/users/{user_id}/tweets/{id}",
            patch(update).put(update).delete(destroy),
        )
        .route("/users/{user_id}/tweets/{id}/edit", get(edit))
}

#[derive(Deserialize)]
struct ListQuery {
    page: Option<String>,
}

/// GET /tweets - Newest tweets, three per page
async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Result<Outcome, AppError> {
    let outcome = tweets::list(state.store.as_ref(), query.page.as_deref()).await?;
    Ok(outcome.with_flash(cookies::read_flash(&jar)))
}

/// GET /tweets/:id
async fn show(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Outcome, AppError> {
    let outcome = tweets::show(state.store.as_ref(), &id).await?;
    Ok(outcome.with_flash(cookies::read_flash(&jar)))
}

/// GET /tweets/new - Empty form
async fn new_tweet(jar: CookieJar) -> Outcome {
    tweets::new_form().with_flash(cookies::read_flash(&jar))
}

/// GET /users/:user_id/tweets/:id/edit
async fn edit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Outcome, AppError> {
    let outcome = tweets::edit_form(state.store.as_ref(), user.as_ref(), &user_id, &id).await?;
    Ok(outcome.with_flash(cookies::read_flash(&jar)))
}

/// POST /users/:user_id/tweets
async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<String>,
    form: Result<Form<TweetParams>, FormRejection>,
) -> Result<Outcome, AppError> {
    tweets::create(state.store.as_ref(), user.as_ref(), &user_id, form_params(form)).await
}

/// PATCH/PUT /users/:user_id/tweets/:id
async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((user_id, id)): Path<(String, String)>,
    form: Result<Form<TweetParams>, FormRejection>,
) -> Result<Outcome, AppError> {
    tweets::update(state.store.as_ref(), user.as_ref(), &user_id, &id, form_params(form)).await
}

/// DELETE /users/:user_id/tweets/:id
async fn destroy(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Outcome, AppError> {
    tweets::destroy(state.store.as_ref(), user.as_ref(), &user_id, &id).await
}

/// An undecodable body carries no `tweet` group. The operations refuse
/// unauthorized callers before they look at the parameters.
fn form_params(form: Result<Form<TweetParams>, FormRejection>) -> TweetParams {
    match form {
        Ok(Form(params)) => params,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "undecodable tweet form");
            TweetParams::default()
        }
    }
}
