//! Tweet domain - models and queries for tweets

pub mod models;
pub mod queries;

pub use models::{NewTweet, Tweet, TweetPage, TweetWithUser, TweetWithUserRow, page_offset};
