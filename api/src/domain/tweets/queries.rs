//! Tweet domain - DB queries for tweets
//!
//! All functions use the generic Executor pattern, allowing them to work with
//! both `&PgPool` (for standalone queries) and `&mut PgConnection` (for transactions).

use sqlx::{Executor, Postgres};

use super::models::{Tweet, TweetWithUserRow};

/// Count all tweets that have an owner (matches the listing join)
pub async fn count_tweets<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM tweets INNER JOIN users ON users.id = tweets.user_id",
    )
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// List tweets newest first with their owners, one page at a time
pub async fn list_tweets_paginated<'e, E>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Result<Vec<TweetWithUserRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT tweets.id, tweets.body, tweets.user_id, tweets.created_at, tweets.updated_at,
               users.username
        FROM tweets
        INNER JOIN users ON users.id = tweets.user_id
        ORDER BY tweets.created_at DESC, tweets.id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

/// Get a tweet by ID
pub async fn get_tweet<'e, E>(executor: E, tweet_id: i64) -> Result<Option<Tweet>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, body, user_id, created_at, updated_at
        FROM tweets
        WHERE id = $1
        "#,
    )
    .bind(tweet_id)
    .fetch_optional(executor)
    .await
}

/// Insert a tweet and return the stored row
pub async fn insert_tweet<'e, E>(
    executor: E,
    user_id: i64,
    body: &str,
) -> Result<Tweet, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO tweets (body, user_id, created_at, updated_at)
        VALUES ($1, $2, NOW(), NOW())
        RETURNING id, body, user_id, created_at, updated_at
        "#,
    )
    .bind(body)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Replace a tweet's body. Returns None if the tweet no longer exists.
pub async fn update_tweet_body<'e, E>(
    executor: E,
    tweet_id: i64,
    body: &str,
) -> Result<Option<Tweet>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        UPDATE tweets
        SET body = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING id, body, user_id, created_at, updated_at
        "#,
    )
    .bind(body)
    .bind(tweet_id)
    .fetch_optional(executor)
    .await
}

/// Delete a tweet
/// Returns true if a row was removed
pub async fn delete_tweet<'e, E>(executor: E, tweet_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
