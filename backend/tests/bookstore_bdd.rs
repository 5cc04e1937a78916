//! Behaviour tests for the bookstore HTTP surface.
//!
//! Each scenario drives the fully assembled application, including the trace
//! middleware and probes, over the in-memory stores.

use std::cell::RefCell;
use std::collections::HashMap;

use actix_web::http::header;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::web;
use bookstore::domain::TRACE_ID_HEADER;
use bookstore::inbound::http::health::HealthState;
use bookstore::inbound::http::state::HttpState;
use bookstore::server::build_app;
use bookstore::test_support::MemoryBackend;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::{Builder, Runtime};
use tokio::task::LocalSet;

struct BookstoreWorld {
    // Actix test services spawn local tasks, so requests run on a LocalSet.
    runtime: Runtime,
    local: LocalSet,
    health: web::Data<HealthState>,
    state: web::Data<HttpState>,
    tokens: RefCell<HashMap<String, String>>,
    last_status: RefCell<Option<u16>>,
    last_body: RefCell<Value>,
}

impl BookstoreWorld {
    fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        Self {
            runtime,
            local: LocalSet::new(),
            health: web::Data::new(HealthState::new()),
            state: web::Data::new(MemoryBackend::new().state),
            tokens: RefCell::new(HashMap::new()),
            last_status: RefCell::new(None),
            last_body: RefCell::new(Value::Null),
        }
    }

    fn send(&self, request: TestRequest) {
        let health = self.health.clone();
        let state = self.state.clone();
        let (status, body) = self.local.block_on(&self.runtime, async move {
            let app = actix_test::init_service(build_app(health, state)).await;
            let response = actix_test::call_service(&app, request.to_request()).await;
            assert!(
                response.headers().contains_key(TRACE_ID_HEADER),
                "every response carries a trace id"
            );
            let status = response.status().as_u16();
            let bytes = actix_test::read_body(response).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("json body")
            };
            (status, body)
        });
        self.last_status.replace(Some(status));
        self.last_body.replace(body);
    }

    fn status(&self) -> u16 {
        self.last_status.borrow().expect("a request was sent")
    }

    fn token(&self, username: &str) -> String {
        self.tokens
            .borrow()
            .get(username)
            .cloned()
            .unwrap_or_else(|| panic!("{username} has not logged in"))
    }

    fn register(&self, username: &str, password: &str) {
        self.send(
            TestRequest::post()
                .uri("/register")
                .set_json(json!({"username": username, "password": password})),
        );
    }

    fn login(&self, username: &str, password: &str) {
        self.send(
            TestRequest::post()
                .uri("/login")
                .set_json(json!({"username": username, "password": password})),
        );
    }

    fn add_book(&self, isbn: &str, title: &str, author: &str) {
        self.send(
            TestRequest::post()
                .uri("/books")
                .set_json(json!({"isbn": isbn, "title": title, "author": author})),
        );
    }

    fn review(&self, username: &str, isbn: &str, text: &str) {
        let bearer = format!("Bearer {}", self.token(username));
        self.send(
            TestRequest::post()
                .uri(&format!("/books/auth/review/{isbn}"))
                .insert_header((header::AUTHORIZATION, bearer))
                .set_json(json!({"review": text})),
        );
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

#[fixture]
fn world() -> BookstoreWorld {
    BookstoreWorld::new()
}

#[given("a running bookstore")]
fn a_running_bookstore(world: &BookstoreWorld) {
    world.health.mark_ready();
}

#[given("{username} has registered with password {password}")]
fn has_registered(world: &BookstoreWorld, username: String, password: String) {
    world.register(&username, &password);
    assert_eq!(world.status(), 200, "registering {username}");
}

#[given("{username} is logged in with password {password}")]
fn is_logged_in(world: &BookstoreWorld, username: String, password: String) {
    world.login(&username, &password);
    assert_eq!(world.status(), 200, "logging in {username}");
    let token = world.last_body.borrow()["token"]
        .as_str()
        .expect("token")
        .to_owned();
    world.tokens.borrow_mut().insert(username, token);
}

#[given("a book {isbn} titled {title} by {author} exists")]
fn a_book_exists(world: &BookstoreWorld, isbn: String, title: String, author: String) {
    world.add_book(&isbn, unquote(&title), unquote(&author));
    assert_eq!(world.status(), 201);
}

#[given("{username} reviews book {isbn} with {text}")]
fn has_reviewed(world: &BookstoreWorld, username: String, isbn: String, text: String) {
    world.review(&username, &isbn, unquote(&text));
    assert_eq!(world.status(), 200);
}

#[when("{username} registers with password {password}")]
fn registers(world: &BookstoreWorld, username: String, password: String) {
    world.register(&username, &password);
}

#[when("{username} logs in with password {password}")]
fn logs_in(world: &BookstoreWorld, username: String, password: String) {
    world.login(&username, &password);
}

#[when("a book {isbn} titled {title} by {author} is added")]
fn a_book_is_added(world: &BookstoreWorld, isbn: String, title: String, author: String) {
    world.add_book(&isbn, unquote(&title), unquote(&author));
}

#[when("{username} reviews book {isbn} with {text}")]
fn reviews(world: &BookstoreWorld, username: String, isbn: String, text: String) {
    world.review(&username, &isbn, unquote(&text));
}

#[when("book {isbn} is reviewed without a token")]
fn reviewed_without_token(world: &BookstoreWorld, isbn: String) {
    world.send(
        TestRequest::post()
            .uri(&format!("/books/auth/review/{isbn}"))
            .set_json(json!({"review": "anonymous"})),
    );
}

#[when("{username} deletes a review of book {isbn}")]
fn deletes_review(world: &BookstoreWorld, username: String, isbn: String) {
    let bearer = format!("Bearer {}", world.token(&username));
    world.send(
        TestRequest::delete()
            .uri(&format!("/books/auth/review/{isbn}"))
            .insert_header((header::AUTHORIZATION, bearer)),
    );
}

#[when("books by author {author} are requested")]
fn books_by_author_requested(world: &BookstoreWorld, author: String) {
    let path = unquote(&author).replace(' ', "%20");
    world.send(TestRequest::get().uri(&format!("/books/author/{path}")));
}

#[when("the readiness probe is requested")]
fn readiness_requested(world: &BookstoreWorld) {
    world.send(TestRequest::get().uri("/health/ready"));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &BookstoreWorld, status: u16) {
    assert_eq!(world.status(), status, "body: {}", world.last_body.borrow());
}

#[then("the response carries a user id")]
fn the_response_carries_a_user_id(world: &BookstoreWorld) {
    let body = world.last_body.borrow();
    let user_id = body["user_id"].as_str().expect("user_id");
    assert!(uuid::Uuid::parse_str(user_id).is_ok(), "user id {user_id}");
}

#[then("the error message is {message}")]
fn the_error_message_is(world: &BookstoreWorld, message: String) {
    let body = world.last_body.borrow();
    assert_eq!(body["message"].as_str(), Some(unquote(&message)));
    assert!(body.get("traceId").and_then(Value::as_str).is_some());
}

#[then("the book has no reviews")]
fn the_book_has_no_reviews(world: &BookstoreWorld) {
    let body = world.last_body.borrow();
    assert_eq!(body["data"]["reviews"], json!([]));
}

#[then("the reviews of book {isbn} are {expected}")]
fn the_reviews_are(world: &BookstoreWorld, isbn: String, expected: String) {
    world.send(TestRequest::get().uri(&format!("/books/reviews/{isbn}")));
    assert_eq!(world.status(), 200);

    let body = world.last_body.borrow();
    let listed: Vec<String> = body["reviews"]
        .as_array()
        .expect("reviews array")
        .iter()
        .map(|review| {
            format!(
                "{}: {}",
                review["username"].as_str().unwrap_or_default(),
                review["review"].as_str().unwrap_or_default()
            )
        })
        .collect();
    let expected: Vec<String> = unquote(&expected)
        .split(", ")
        .map(str::to_owned)
        .collect();
    assert_eq!(listed, expected);
}

#[then("the response lists book {isbn}")]
fn the_response_lists_book(world: &BookstoreWorld, isbn: String) {
    assert_eq!(world.status(), 200);
    let body = world.last_body.borrow();
    let isbns: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|book| book["isbn"].as_str())
        .collect();
    assert_eq!(isbns, vec![isbn.as_str()]);
}

#[scenario(
    path = "tests/features/bookstore.feature",
    name = "Usernames are unique"
)]
fn usernames_are_unique(world: BookstoreWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/bookstore.feature",
    name = "Failed logins do not reveal which part was wrong"
)]
fn failed_logins_do_not_reveal_which_part_was_wrong(world: BookstoreWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/bookstore.feature",
    name = "A reader keeps a single review per book"
)]
fn a_reader_keeps_a_single_review_per_book(world: BookstoreWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/bookstore.feature",
    name = "Author lookups match the whole name regardless of case"
)]
fn author_lookups_match_the_whole_name_regardless_of_case(world: BookstoreWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/bookstore.feature",
    name = "Readers cannot delete reviews they did not write"
)]
fn readers_cannot_delete_reviews_they_did_not_write(world: BookstoreWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/bookstore.feature",
    name = "Review changes require a bearer token"
)]
fn review_changes_require_a_bearer_token(world: BookstoreWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/bookstore.feature",
    name = "The service reports readiness once started"
)]
fn the_service_reports_readiness_once_started(world: BookstoreWorld) {
    drop(world);
}
