//! Tweet model definitions

use chrono::{DateTime, Utc};

use crate::domain::users::User;

/// A tweet as stored
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Tweet {
    pub id: i64,
    pub body: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a tweet. `user_id` always comes from the resolved identity.
#[derive(Debug, Clone)]
pub struct NewTweet {
    pub body: String,
    pub user_id: i64,
}

/// A tweet with its owner eagerly loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetWithUser {
    pub tweet: Tweet,
    pub user: User,
}

/// Joined row used by the listing query
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetWithUserRow {
    pub id: i64,
    pub body: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: String,
}

impl From<TweetWithUserRow> for TweetWithUser {
    fn from(row: TweetWithUserRow) -> Self {
        Self {
            user: User {
                id: row.user_id,
                username: row.username,
            },
            tweet: Tweet {
                id: row.id,
                body: row.body,
                user_id: row.user_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// One page of the newest-first tweet listing
#[derive(Debug, Clone)]
pub struct TweetPage {
    pub tweets: Vec<TweetWithUser>,
    pub current_page: u32,
    pub per_page: u32,
    pub total_count: i64,
}

impl TweetPage {
    pub fn total_pages(&self) -> u32 {
        if self.total_count <= 0 || self.per_page == 0 {
            return 0;
        }
        let per_page = i64::from(self.per_page);
        ((self.total_count + per_page - 1) / per_page) as u32
    }
}

/// Row offset for a 1-based page number
pub fn page_offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(per_page)
}
