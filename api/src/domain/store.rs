//! Tweet persistence interface and its Postgres implementation

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::tweets::{self, NewTweet, Tweet, TweetPage, TweetWithUser};
use super::users::{self, User};
use super::validation::{ValidationErrors, validate_body};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage operations the tweet handler delegates to.
///
/// Writes are validated by the store; a rejected write returns
/// [`StoreError::Validation`] and leaves storage untouched.
#[async_trait]
pub trait TweetStore: Send + Sync {
    /// Newest-first page of tweets (1-based), each with its owner attached.
    async fn list_page(&self, page: u32, per_page: u32) -> Result<TweetPage, StoreError>;

    async fn find(&self, tweet_id: i64) -> Result<Option<Tweet>, StoreError>;

    async fn create(&self, new_tweet: NewTweet) -> Result<Tweet, StoreError>;

    /// Replace only the body. Returns None if the tweet is gone.
    async fn update_body(&self, tweet_id: i64, body: &str) -> Result<Option<Tweet>, StoreError>;

    /// Returns true if a tweet was removed.
    async fn delete(&self, tweet_id: i64) -> Result<bool, StoreError>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError>;
}

/// Postgres-backed store.
///
/// Expects `users(id, username)` and
/// `tweets(id, body, user_id REFERENCES users, created_at, updated_at)`.
#[derive(Clone)]
pub struct PgTweetStore {
    db: PgPool,
}

impl PgTweetStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TweetStore for PgTweetStore {
    async fn list_page(&self, page: u32, per_page: u32) -> Result<TweetPage, StoreError> {
        let total_count = tweets::queries::count_tweets(&self.db).await?;
        let rows = tweets::queries::list_tweets_paginated(
            &self.db,
            i64::from(per_page),
            tweets::page_offset(page, per_page),
        )
        .await?;

        Ok(TweetPage {
            tweets: rows.into_iter().map(TweetWithUser::from).collect(),
            current_page: page,
            per_page,
            total_count,
        })
    }

    async fn find(&self, tweet_id: i64) -> Result<Option<Tweet>, StoreError> {
        Ok(tweets::queries::get_tweet(&self.db, tweet_id).await?)
    }

    async fn create(&self, new_tweet: NewTweet) -> Result<Tweet, StoreError> {
        validate_body(&new_tweet.body).map_err(StoreError::Validation)?;
        Ok(tweets::queries::insert_tweet(&self.db, new_tweet.user_id, &new_tweet.body).await?)
    }

    async fn update_body(&self, tweet_id: i64, body: &str) -> Result<Option<Tweet>, StoreError> {
        validate_body(body).map_err(StoreError::Validation)?;
        Ok(tweets::queries::update_tweet_body(&self.db, tweet_id, body).await?)
    }

    async fn delete(&self, tweet_id: i64) -> Result<bool, StoreError> {
        Ok(tweets::queries::delete_tweet(&self.db, tweet_id).await?)
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(users::get_user_by_id(&self.db, user_id).await?)
    }
}
