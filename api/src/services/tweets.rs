//! Tweet resource operations.
//!
//! Every operation receives the store and, where ownership matters, the
//! identity resolved for the current request. Ownership and lookup run as
//! explicit preconditions at the top of each operation, before any write.

use serde::Deserialize;

use crate::constants::{
    NOTICE_CREATED, NOTICE_DESTROYED, NOTICE_UPDATED, PER_PAGE, ROOT_PATH, TWEETS_PATH,
};
use crate::domain::store::{StoreError, TweetStore};
use crate::domain::tweets::{NewTweet, Tweet};
use crate::domain::users::User;
use crate::domain::validation::ValidationErrors;
use crate::error::AppError;
use crate::services::error::LogErr;
use crate::views::{Outcome, TweetFormResponse, TweetResponse, View};

/// Submitted tweet fields. `tweet[body]` is the only field read; anything
/// else in the form (`tweet[user_id]` included) is dropped on deserialize.
#[derive(Debug, Default, Deserialize)]
pub struct TweetParams {
    #[serde(rename = "tweet[body]")]
    pub body: Option<String>,
}

impl TweetParams {
    /// The `tweet` group must be present; an empty body is left to validation.
    pub fn require(self) -> Result<String, AppError> {
        self.body.ok_or(AppError::ParameterMissing("tweet"))
    }
}

/// 1-based page number; anything missing or unusable means the first page
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Ids that do not parse can't name a tweet
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::NotFound)
}

/// The caller must be signed in and be the user named in the path.
/// Compared as strings, so `"01"` does not match user 1.
pub fn authorize<'u>(identity: Option<&'u User>, path_user_id: &str) -> Result<&'u User, AppError> {
    match identity {
        Some(user) if user.id.to_string() == path_user_id => Ok(user),
        Some(user) => {
            tracing::warn!(user_id = user.id, path_user_id, "Refused action on another user's path");
            Err(AppError::Unauthorized)
        }
        None => {
            tracing::warn!(path_user_id, "Refused action without identity");
            Err(AppError::Unauthorized)
        }
    }
}

async fn find_tweet(store: &dyn TweetStore, raw_id: &str) -> Result<Tweet, AppError> {
    let tweet_id = parse_id(raw_id)?;
    store
        .find(tweet_id)
        .await
        .log_err("Find tweet error")?
        .ok_or(AppError::NotFound)
}

/// A path user matching the caller is not enough: the tweet must be theirs too.
fn ensure_owner(user: &User, tweet: &Tweet) -> Result<(), AppError> {
    if tweet.user_id == user.id {
        Ok(())
    } else {
        tracing::warn!(
            user_id = user.id,
            tweet_id = tweet.id,
            owner_id = tweet.user_id,
            "Refused action on tweet owned by another user"
        );
        Err(AppError::Unauthorized)
    }
}

/// List: newest first, `PER_PAGE` per page, owners attached
pub async fn list(store: &dyn TweetStore, page: Option<&str>) -> Result<Outcome, AppError> {
    let page = parse_page(page);
    let tweets = store
        .list_page(page, PER_PAGE)
        .await
        .log_err("List tweets error")?;

    Ok(Outcome::render(View::Index(tweets.into())))
}

pub async fn show(store: &dyn TweetStore, id: &str) -> Result<Outcome, AppError> {
    let tweet = find_tweet(store, id).await?;
    Ok(Outcome::render(View::Show {
        tweet: tweet.into(),
    }))
}

pub fn new_form() -> Outcome {
    Outcome::render(View::New {
        tweet: TweetFormResponse::default(),
        errors: ValidationErrors::new(),
    })
}

pub async fn edit_form(
    store: &dyn TweetStore,
    identity: Option<&User>,
    user_id: &str,
    id: &str,
) -> Result<Outcome, AppError> {
    let user = authorize(identity, user_id)?;
    let tweet = find_tweet(store, id).await?;
    ensure_owner(user, &tweet)?;

    Ok(Outcome::render(View::Edit {
        tweet: tweet.into(),
        errors: ValidationErrors::new(),
    }))
}

pub async fn create(
    store: &dyn TweetStore,
    identity: Option<&User>,
    user_id: &str,
    params: TweetParams,
) -> Result<Outcome, AppError> {
    let user = authorize(identity, user_id)?;
    let body = params.require()?;

    let new_tweet = NewTweet {
        body: body.clone(),
        user_id: user.id,
    };

    match store.create(new_tweet).await {
        Ok(tweet) => {
            tracing::info!(tweet_id = tweet.id, user_id = user.id, "Tweet created");
            Ok(Outcome::redirect(ROOT_PATH, NOTICE_CREATED))
        }
        Err(StoreError::Validation(errors)) => {
            tracing::info!(user_id = user.id, %errors, "Tweet rejected");
            Ok(Outcome::rerender(View::New {
                tweet: TweetFormResponse { body },
                errors,
            }))
        }
        Err(e) => Err(e).log_err("Create tweet error"),
    }
}

pub async fn update(
    store: &dyn TweetStore,
    identity: Option<&User>,
    user_id: &str,
    id: &str,
    params: TweetParams,
) -> Result<Outcome, AppError> {
    let user = authorize(identity, user_id)?;
    let body = params.require()?;
    let tweet = find_tweet(store, id).await?;
    ensure_owner(user, &tweet)?;

    match store.update_body(tweet.id, &body).await {
        Ok(Some(updated)) => {
            tracing::info!(tweet_id = updated.id, user_id = user.id, "Tweet updated");
            Ok(Outcome::redirect(ROOT_PATH, NOTICE_UPDATED))
        }
        Ok(None) => Err(AppError::NotFound),
        Err(StoreError::Validation(errors)) => {
            tracing::info!(tweet_id = tweet.id, user_id = user.id, %errors, "Tweet update rejected");
            // Show the rejected input back in the form
            let mut tweet = TweetResponse::from(tweet);
            tweet.body = body;
            Ok(Outcome::rerender(View::Edit { tweet, errors }))
        }
        Err(e) => Err(e).log_err("Update tweet error"),
    }
}

pub async fn destroy(
    store: &dyn TweetStore,
    identity: Option<&User>,
    user_id: &str,
    id: &str,
) -> Result<Outcome, AppError> {
    let user = authorize(identity, user_id)?;
    let tweet = find_tweet(store, id).await?;
    ensure_owner(user, &tweet)?;

    let deleted = store
        .delete(tweet.id)
        .await
        .log_err("Delete tweet error")?;

    // Gone between lookup and delete
    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(tweet_id = tweet.id, user_id = user.id, "Tweet destroyed");
    Ok(Outcome::redirect(TWEETS_PATH, NOTICE_DESTROYED))
}
