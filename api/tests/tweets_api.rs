use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use tweeter_api::domain::memory::MemoryTweetStore;
use tweeter_api::domain::store::TweetStore;
use tweeter_api::domain::users::User;
use tweeter_api::services::session::create_access_token;
use tweeter_api::{AppState, build_app};

const JWT_SECRET: &[u8] = b"integration-test-secret";

struct TestApp {
    app: Router,
    store: Arc<MemoryTweetStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryTweetStore::new());
        let app = build_app(AppState {
            store: store.clone(),
            jwt_secret: JWT_SECRET.to_vec(),
        });
        Self { app, store }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn tweet_count(&self) -> i64 {
        self.store.list_page(1, 3).await.unwrap().total_count
    }
}

fn session_cookie(user: &User) -> String {
    let token = create_access_token(user.id, JWT_SECRET).unwrap();
    format!("access_token={}", token)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn form(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// No body and no content type
fn bare(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .unwrap()
}

/// `name=value` pair of the flash Set-Cookie, ready to send back
fn flash_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("flash="))
        .and_then(|v| v.split(';').next())
        .expect("response sets a flash cookie")
        .to_string()
}

fn assert_invalid_action(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), "/");
    assert_eq!(flash_cookie(response), "flash=alert.Invalid%20action");
}

#[tokio::test]
async fn create_assigns_owner_from_identity_not_form() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let u2 = t.store.add_user("u2").await;
    let cookie = session_cookie(&u1);

    let response = t
        .send(form(
            "POST",
            &format!("/users/{}/tweets", u1.id),
            Some(&cookie),
            &format!("tweet%5Bbody%5D=hello+world&tweet%5Buser_id%5D={}", u2.id),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(
        flash_cookie(&response),
        "flash=notice.Tweet%20was%20successfully%20created%2E"
    );

    let page = t.store.list_page(1, 3).await.unwrap();
    assert_eq!(page.tweets.len(), 1);
    assert_eq!(page.tweets[0].tweet.body, "hello world");
    assert_eq!(page.tweets[0].tweet.user_id, u1.id);
}

#[tokio::test]
async fn flash_is_shown_once_then_cleared() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let cookie = session_cookie(&u1);

    let created = t
        .send(form(
            "POST",
            &format!("/users/{}/tweets", u1.id),
            Some(&cookie),
            "tweet%5Bbody%5D=first",
        ))
        .await;
    let flash = flash_cookie(&created);

    let listing = t.send(get("/", Some(&flash))).await;
    assert_eq!(listing.status(), StatusCode::OK);
    assert_eq!(flash_cookie(&listing), "flash=");
    let body = json(listing).await;
    assert_eq!(body["view"], "tweets/index");
    assert_eq!(body["flash"]["kind"], "notice");
    assert_eq!(body["flash"]["message"], "Tweet was successfully created.");

    let again = json(t.send(get("/", None)).await).await;
    assert!(again.get("flash").is_none());
}

#[tokio::test]
async fn list_pages_three_newest_first_with_users() {
    let t = TestApp::new();
    let ada = t.store.add_user("ada").await;
    let bob = t.store.add_user("bob").await;
    let base = Utc::now() - Duration::hours(1);
    for i in 0..7 {
        let owner = if i % 2 == 0 { ada.id } else { bob.id };
        t.store
            .seed_tweet(owner, &format!("tweet {}", i), base + Duration::minutes(i))
            .await;
    }

    let first = json(t.send(get("/tweets", None)).await).await;
    assert_eq!(first["view"], "tweets/index");
    assert_eq!(first["current_page"], 1);
    assert_eq!(first["per_page"], 3);
    assert_eq!(first["total_count"], 7);
    assert_eq!(first["total_pages"], 3);
    let bodies: Vec<&str> = first["tweets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, ["tweet 6", "tweet 5", "tweet 4"]);
    assert_eq!(first["tweets"][0]["user"]["username"], "ada");
    assert_eq!(first["tweets"][1]["user"]["username"], "bob");

    let third = json(t.send(get("/tweets?page=3", None)).await).await;
    let bodies: Vec<&str> = third["tweets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, ["tweet 0"]);

    let beyond = json(t.send(get("/tweets?page=9", None)).await).await;
    assert_eq!(beyond["tweets"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn invalid_page_falls_back_to_first() {
    let t = TestApp::new();
    let ada = t.store.add_user("ada").await;
    t.store.seed_tweet(ada.id, "only", Utc::now()).await;

    for uri in ["/tweets?page=abc", "/tweets?page=0", "/tweets?page="] {
        let body = json(t.send(get(uri, None)).await).await;
        assert_eq!(body["current_page"], 1, "{}", uri);
        assert_eq!(body["tweets"][0]["body"], "only");
    }
}

#[tokio::test]
async fn show_and_new_need_no_identity() {
    let t = TestApp::new();
    let ada = t.store.add_user("ada").await;
    let tweet = t.store.seed_tweet(ada.id, "public", Utc::now()).await;

    let response = t.send(get(&format!("/tweets/{}", tweet.id), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["view"], "tweets/show");
    assert_eq!(body["tweet"]["body"], "public");
    assert_eq!(body["tweet"]["user_id"], ada.id);

    let response = t.send(get("/tweets/new", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["view"], "tweets/new");
    assert_eq!(body["tweet"]["body"], "");
}

#[tokio::test]
async fn show_unknown_tweet_is_not_found() {
    let t = TestApp::new();

    for uri in ["/tweets/404", "/tweets/not-a-number"] {
        let response = t.send(get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(json(response).await["error"], "not_found");
    }
}

#[tokio::test]
async fn mutations_without_matching_identity_are_refused() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let u2 = t.store.add_user("u2").await;
    let tweet = t.store.seed_tweet(u2.id, "u2's tweet", Utc::now()).await;
    let u1_cookie = session_cookie(&u1);

    // Path names u2, caller is u1
    let cases = [
        get(
            &format!("/users/{}/tweets/{}/edit", u2.id, tweet.id),
            Some(&u1_cookie),
        ),
        form(
            "POST",
            &format!("/users/{}/tweets", u2.id),
            Some(&u1_cookie),
            "tweet%5Bbody%5D=sneaky",
        ),
        form(
            "PATCH",
            &format!("/users/{}/tweets/{}", u2.id, tweet.id),
            Some(&u1_cookie),
            "tweet%5Bbody%5D=sneaky",
        ),
        delete(
            &format!("/users/{}/tweets/{}", u2.id, tweet.id),
            Some(&u1_cookie),
        ),
        // No identity at all
        form(
            "POST",
            &format!("/users/{}/tweets", u2.id),
            None,
            "tweet%5Bbody%5D=anon",
        ),
        delete(&format!("/users/{}/tweets/{}", u2.id, tweet.id), None),
        get(&format!("/users/{}/tweets/{}/edit", u2.id, tweet.id), None),
        // Bodies that do not decode as a tweet form
        bare("POST", &format!("/users/{}/tweets", u2.id), None),
        bare(
            "PATCH",
            &format!("/users/{}/tweets/{}", u2.id, tweet.id),
            Some(&u1_cookie),
        ),
        form(
            "PATCH",
            &format!("/users/{}/tweets/{}", u2.id, tweet.id),
            None,
            "tweet%5Bbody%5D=a&tweet%5Bbody%5D=b",
        ),
        form(
            "PUT",
            &format!("/users/{}/tweets/{}", u2.id, tweet.id),
            Some(&u1_cookie),
            "tweet%5Bbody%5D=a&tweet%5Bbody%5D=b",
        ),
        // Token that does not verify
        delete(
            &format!("/users/{}/tweets/{}", u2.id, tweet.id),
            Some("access_token=garbage"),
        ),
    ];

    for request in cases {
        let response = t.send(request).await;
        assert_invalid_action(&response);
    }

    assert_eq!(t.tweet_count().await, 1);
    assert_eq!(t.store.find(tweet.id).await.unwrap(), Some(tweet));
}

#[tokio::test]
async fn update_of_another_users_tweet_via_own_path_is_refused() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let u2 = t.store.add_user("u2").await;
    let tweet = t.store.seed_tweet(u2.id, "u2's tweet", Utc::now()).await;
    let cookie = session_cookie(&u1);

    let response = t
        .send(form(
            "PATCH",
            &format!("/users/{}/tweets/{}", u1.id, tweet.id),
            Some(&cookie),
            "tweet%5Bbody%5D=hijacked",
        ))
        .await;
    assert_invalid_action(&response);

    let response = t
        .send(delete(
            &format!("/users/{}/tweets/{}", u1.id, tweet.id),
            Some(&cookie),
        ))
        .await;
    assert_invalid_action(&response);

    assert_eq!(t.store.find(tweet.id).await.unwrap(), Some(tweet));
}

#[tokio::test]
async fn update_changes_only_the_body() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let u2 = t.store.add_user("u2").await;
    let created_at = Utc::now() - Duration::days(1);
    let tweet = t.store.seed_tweet(u1.id, "draft", created_at).await;
    let cookie = session_cookie(&u1);

    for method in ["PATCH", "PUT"] {
        let response = t
            .send(form(
                method,
                &format!("/users/{}/tweets/{}", u1.id, tweet.id),
                Some(&cookie),
                &format!(
                    "tweet%5Bbody%5D=final+{}&tweet%5Buser_id%5D={}&tweet%5Bid%5D=99&tweet%5Bcreated_at%5D=2000-01-01",
                    method, u2.id
                ),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(
            flash_cookie(&response),
            "flash=notice.Tweet%20was%20successfully%20updated%2E"
        );

        let stored = t.store.find(tweet.id).await.unwrap().unwrap();
        assert_eq!(stored.body, format!("final {}", method));
        assert_eq!(stored.id, tweet.id);
        assert_eq!(stored.user_id, u1.id);
        assert_eq!(stored.created_at, created_at);
    }
    assert!(t.store.find(99).await.unwrap().is_none());
}

#[tokio::test]
async fn edit_form_renders_for_owner() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let tweet = t.store.seed_tweet(u1.id, "editable", Utc::now()).await;
    let cookie = session_cookie(&u1);

    let response = t
        .send(get(
            &format!("/users/{}/tweets/{}/edit", u1.id, tweet.id),
            Some(&cookie),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["view"], "tweets/edit");
    assert_eq!(body["tweet"]["id"], tweet.id);
    assert_eq!(body["tweet"]["body"], "editable");
    assert_eq!(body["errors"], serde_json::json!({}));

    let missing = t
        .send(get(&format!("/users/{}/tweets/9999/edit", u1.id), Some(&cookie)))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_with_empty_body_rerenders_form() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let cookie = session_cookie(&u1);

    let response = t
        .send(form(
            "POST",
            &format!("/users/{}/tweets", u1.id),
            Some(&cookie),
            "tweet%5Bbody%5D=",
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.headers().get(header::LOCATION).is_none());
    let body = json(response).await;
    assert_eq!(body["view"], "tweets/new");
    assert_eq!(body["errors"]["body"][0], "can't be blank");
    assert_eq!(t.tweet_count().await, 0);
}

#[tokio::test]
async fn create_with_overlong_body_rerenders_form() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let cookie = session_cookie(&u1);
    let long = "a".repeat(281);

    let response = t
        .send(form(
            "POST",
            &format!("/users/{}/tweets", u1.id),
            Some(&cookie),
            &format!("tweet%5Bbody%5D={}", long),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["tweet"]["body"], long);
    assert_eq!(
        body["errors"]["body"][0],
        "is too long (maximum is 280 characters)"
    );
    assert_eq!(t.tweet_count().await, 0);
}

#[tokio::test]
async fn update_with_blank_body_rerenders_edit_and_keeps_tweet() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let tweet = t.store.seed_tweet(u1.id, "keep me", Utc::now()).await;
    let cookie = session_cookie(&u1);

    let response = t
        .send(form(
            "PATCH",
            &format!("/users/{}/tweets/{}", u1.id, tweet.id),
            Some(&cookie),
            "tweet%5Bbody%5D=+++",
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["view"], "tweets/edit");
    assert_eq!(body["tweet"]["id"], tweet.id);
    assert_eq!(body["tweet"]["body"], "   ");
    assert_eq!(body["errors"]["body"][0], "can't be blank");

    assert_eq!(t.store.find(tweet.id).await.unwrap(), Some(tweet));
}

#[tokio::test]
async fn missing_tweet_params_is_bad_request() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let cookie = session_cookie(&u1);

    let response = t
        .send(form(
            "POST",
            &format!("/users/{}/tweets", u1.id),
            Some(&cookie),
            "unrelated=1",
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "parameter_missing");
    assert_eq!(t.tweet_count().await, 0);
}

#[tokio::test]
async fn owner_with_undecodable_body_gets_parameter_missing() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let tweet = t.store.seed_tweet(u1.id, "original", Utc::now()).await;
    let cookie = session_cookie(&u1);

    let cases = [
        bare("POST", &format!("/users/{}/tweets", u1.id), Some(&cookie)),
        bare(
            "PATCH",
            &format!("/users/{}/tweets/{}", u1.id, tweet.id),
            Some(&cookie),
        ),
        form(
            "PATCH",
            &format!("/users/{}/tweets/{}", u1.id, tweet.id),
            Some(&cookie),
            "tweet%5Bbody%5D=a&tweet%5Bbody%5D=b",
        ),
    ];

    for request in cases {
        let response = t.send(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"], "parameter_missing");
    }

    assert_eq!(t.tweet_count().await, 1);
    assert_eq!(t.store.find(tweet.id).await.unwrap(), Some(tweet));
}

#[tokio::test]
async fn destroy_removes_tweet_and_redirects_to_listing() {
    let t = TestApp::new();
    let u1 = t.store.add_user("u1").await;
    let tweet = t.store.seed_tweet(u1.id, "short-lived", Utc::now()).await;
    let cookie = session_cookie(&u1);
    let uri = format!("/users/{}/tweets/{}", u1.id, tweet.id);

    let response = t.send(delete(&uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tweets");
    assert_eq!(
        flash_cookie(&response),
        "flash=notice.Tweet%20was%20successfully%20destroyed%2E"
    );

    let shown = t.send(get(&format!("/tweets/{}", tweet.id), None)).await;
    assert_eq!(shown.status(), StatusCode::NOT_FOUND);

    let again = t.send(delete(&uri, Some(&cookie))).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn token_for_unknown_user_is_no_identity() {
    let t = TestApp::new();
    let ghost = User {
        id: 4242,
        username: "ghost".to_string(),
    };

    let response = t
        .send(form(
            "POST",
            &format!("/users/{}/tweets", ghost.id),
            Some(&session_cookie(&ghost)),
            "tweet%5Bbody%5D=boo",
        ))
        .await;

    assert_invalid_action(&response);
    assert_eq!(t.tweet_count().await, 0);
}

#[tokio::test]
async fn health_reports_ok() {
    let t = TestApp::new();
    let response = t.send(get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}
