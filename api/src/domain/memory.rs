//! In-memory tweet store.
//!
//! Intended for tests/dev. Applies the same validation and ordering rules as
//! the Postgres store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::store::{StoreError, TweetStore};
use super::tweets::{NewTweet, Tweet, TweetPage, TweetWithUser, page_offset};
use super::users::User;
use super::validation::validate_body;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tweets: BTreeMap<i64, Tweet>,
    last_user_id: i64,
    last_tweet_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryTweetStore {
    tables: RwLock<Tables>,
}

impl MemoryTweetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return it with its assigned id.
    pub async fn add_user(&self, username: &str) -> User {
        let mut tables = self.tables.write().await;
        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: username.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    /// Insert a tweet with an explicit creation time, bypassing validation.
    pub async fn seed_tweet(&self, user_id: i64, body: &str, created_at: DateTime<Utc>) -> Tweet {
        let mut tables = self.tables.write().await;
        insert(&mut tables, user_id, body.to_string(), created_at)
    }
}

fn insert(tables: &mut Tables, user_id: i64, body: String, created_at: DateTime<Utc>) -> Tweet {
    tables.last_tweet_id += 1;
    let tweet = Tweet {
        id: tables.last_tweet_id,
        body,
        user_id,
        created_at,
        updated_at: created_at,
    };
    tables.tweets.insert(tweet.id, tweet.clone());
    tweet
}

#[async_trait]
impl TweetStore for MemoryTweetStore {
    async fn list_page(&self, page: u32, per_page: u32) -> Result<TweetPage, StoreError> {
        let tables = self.tables.read().await;

        let mut joined: Vec<TweetWithUser> = tables
            .tweets
            .values()
            .filter_map(|tweet| {
                tables.users.get(&tweet.user_id).map(|user| TweetWithUser {
                    tweet: tweet.clone(),
                    user: user.clone(),
                })
            })
            .collect();

        joined.sort_by(|a, b| {
            b.tweet
                .created_at
                .cmp(&a.tweet.created_at)
                .then(b.tweet.id.cmp(&a.tweet.id))
        });

        let total_count = joined.len() as i64;
        let offset = page_offset(page, per_page) as usize;
        let tweets = joined
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();

        Ok(TweetPage {
            tweets,
            current_page: page,
            per_page,
            total_count,
        })
    }

    async fn find(&self, tweet_id: i64) -> Result<Option<Tweet>, StoreError> {
        Ok(self.tables.read().await.tweets.get(&tweet_id).cloned())
    }

    async fn create(&self, new_tweet: NewTweet) -> Result<Tweet, StoreError> {
        validate_body(&new_tweet.body).map_err(StoreError::Validation)?;
        let mut tables = self.tables.write().await;
        Ok(insert(&mut tables, new_tweet.user_id, new_tweet.body, Utc::now()))
    }

    async fn update_body(&self, tweet_id: i64, body: &str) -> Result<Option<Tweet>, StoreError> {
        validate_body(body).map_err(StoreError::Validation)?;
        let mut tables = self.tables.write().await;
        Ok(tables.tweets.get_mut(&tweet_id).map(|tweet| {
            tweet.body = body.to_string();
            tweet.updated_at = Utc::now();
            tweet.clone()
        }))
    }

    async fn delete(&self, tweet_id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.tweets.remove(&tweet_id).is_some())
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }
}
