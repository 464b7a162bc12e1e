//! View-context DTOs for tweets

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::tweets::{Tweet, TweetPage, TweetWithUser};
use crate::domain::users::User;

/// Tweet as exposed to views
#[derive(Debug, Clone, Serialize)]
pub struct TweetResponse {
    pub id: i64,
    pub body: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tweet> for TweetResponse {
    fn from(t: Tweet) -> Self {
        Self {
            id: t.id,
            body: t.body,
            user_id: t.user_id,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
        }
    }
}

/// Listing entry: the tweet plus its eagerly loaded owner
#[derive(Debug, Clone, Serialize)]
pub struct TweetWithUserResponse {
    #[serde(flatten)]
    pub tweet: TweetResponse,
    pub user: UserResponse,
}

impl From<TweetWithUser> for TweetWithUserResponse {
    fn from(t: TweetWithUser) -> Self {
        Self {
            tweet: t.tweet.into(),
            user: t.user.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TweetPageResponse {
    pub tweets: Vec<TweetWithUserResponse>,
    pub current_page: u32,
    pub per_page: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

impl From<TweetPage> for TweetPageResponse {
    fn from(page: TweetPage) -> Self {
        let total_pages = page.total_pages();
        Self {
            tweets: page.tweets.into_iter().map(Into::into).collect(),
            current_page: page.current_page,
            per_page: page.per_page,
            total_count: page.total_count,
            total_pages,
        }
    }
}

/// Unsaved tweet for the new-tweet form
#[derive(Debug, Clone, Default, Serialize)]
pub struct TweetFormResponse {
    pub body: String,
}
