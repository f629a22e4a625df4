//! In-memory repositories and request helpers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use stockroom::model::{Category, CategoryInput, Item, ItemInput, User};
use stockroom::validation::FieldErrors;
use stockroom::{
    app, AppError, AppState, Categories, HealthProbe, Items, Listing, NewAccount,
    PaginationSettings, Repository, UserRepository, Window,
};
use stockroom::filter::ItemFilter;
use tower::ServiceExt;

#[derive(Default)]
pub struct MemoryItems {
    rows: Mutex<Vec<Item>>,
}

impl MemoryItems {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Insert with a fixed creation time, for date-range tests.
    pub fn seed(&self, input: ItemInput, created_at: DateTime<Utc>) -> Item {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let item = input.into_item(id, created_at);
        rows.push(item.clone());
        item
    }
}

fn sku_taken() -> AppError {
    AppError::Validation(FieldErrors::single("sku", "item with this sku already exists."))
}

#[async_trait]
impl Repository<Items> for MemoryItems {
    async fn find(&self, sku: &str) -> Result<Option<Item>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|i| i.sku == sku).cloned())
    }

    async fn list(&self, filter: &ItemFilter, window: Window) -> Result<Listing<Item>, AppError> {
        let mut matching: Vec<Item> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        matching.sort_by_key(|i| i.id);
        let count = matching.len() as u64;
        let records = matching[window.range(matching.len())].to_vec();
        Ok(Listing { count, records })
    }

    async fn create(&self, input: ItemInput) -> Result<Item, AppError> {
        if self.rows.lock().unwrap().iter().any(|i| i.sku == input.sku) {
            return Err(sku_taken());
        }
        Ok(self.seed(input, Utc::now()))
    }

    async fn replace(&self, sku: &str, input: ItemInput) -> Result<Option<Item>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if input.sku != sku && rows.iter().any(|i| i.sku == input.sku) {
            return Err(sku_taken());
        }
        let Some(row) = rows.iter_mut().find(|i| i.sku == sku) else {
            return Ok(None);
        };
        *row = input.into_item(row.id, row.created_at);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, sku: &str) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|i| i.sku != sku);
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryCategories {
    rows: Mutex<Vec<Category>>,
}

#[async_trait]
impl Repository<Categories> for MemoryCategories {
    async fn list(&self, _filter: &(), window: Window) -> Result<Listing<Category>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(Listing {
            count: rows.len() as u64,
            records: rows[window.range(rows.len())].to_vec(),
        })
    }

    async fn create(&self, input: CategoryInput) -> Result<Category, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let category = Category {
            id: rows.len() as i64 + 1,
            name: input.name,
        };
        rows.push(category.clone());
        Ok(category)
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<User>>,
    tokens: Mutex<HashMap<i64, String>>,
}

impl MemoryUsers {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create(&self, account: NewAccount) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == account.username) {
            return Err(AppError::Validation(FieldErrors::single(
                "username",
                "A user with that username already exists.",
            )));
        }
        let user = User {
            id: users.len() as i64 + 1,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            date_joined: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn token_for(&self, user_id: i64) -> Result<String, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .entry(user_id)
            .or_insert_with(stockroom::auth::generate_token)
            .clone())
    }

    async fn user_for_token(&self, key: &str) -> Result<Option<User>, AppError> {
        let user_id = self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|(_, k)| k.as_str() == key)
            .map(|(id, _)| *id);
        Ok(user_id.and_then(|id| {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned()
        }))
    }
}

pub struct Probe {
    pub healthy: AtomicBool,
}

#[async_trait]
impl HealthProbe for Probe {
    async fn ping(&self) -> Result<(), AppError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Internal("probe down".into()))
        }
    }
}

/// Drives a router one request at a time.
#[derive(Clone)]
pub struct Client {
    pub router: Router,
}

impl Client {
    pub fn new(router: Router) -> Self {
        Client { router }
    }

    /// JSON request with an optional `Token` header. The `Host` is `testserver`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "testserver");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.raw(builder.body(body).unwrap()).await
    }

    pub async fn raw(&self, request: Request<Body>) -> Response {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .map(|v| v.to_str().unwrap().to_string())
        };
        let www_authenticate = header_value(header::WWW_AUTHENTICATE);
        let content_type = header_value(header::CONTENT_TYPE);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let is_json = content_type
            .as_deref()
            .is_some_and(|t| t.starts_with("application/json"));
        let json = if is_json {
            serde_json::from_str(&text).unwrap()
        } else {
            Value::Null
        };
        Response {
            status,
            www_authenticate,
            content_type,
            text,
            json,
        }
    }

    /// Create an account and return its token.
    pub async fn login(&self, username: &str) -> String {
        let created = self
            .send(
                Method::POST,
                "/create_user/",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "s3cret-pass"
                })),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.json);
        let token = self
            .send(
                Method::POST,
                "/api-token-auth/",
                None,
                Some(serde_json::json!({"username": username, "password": "s3cret-pass"})),
            )
            .await;
        assert_eq!(token.status, StatusCode::OK, "{:?}", token.json);
        token.json["token"].as_str().unwrap().to_string()
    }
}

/// A router over fresh in-memory stores, with handles to inspect them.
pub struct TestApp {
    pub client: Client,
    pub items: Arc<MemoryItems>,
    pub categories: Arc<MemoryCategories>,
    pub users: Arc<MemoryUsers>,
    pub probe: Arc<Probe>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_pagination(PaginationSettings::default())
    }

    pub fn with_pagination(pagination: PaginationSettings) -> Self {
        let items = Arc::new(MemoryItems::default());
        let categories = Arc::new(MemoryCategories::default());
        let users = Arc::new(MemoryUsers::default());
        let probe = Arc::new(Probe {
            healthy: AtomicBool::new(true),
        });
        let state = AppState {
            items: items.clone(),
            categories: categories.clone(),
            users: users.clone(),
            probe: probe.clone(),
            pagination: Arc::new(pagination),
        };
        TestApp {
            client: Client::new(app(state, 64 * 1024)),
            items,
            categories,
            users,
            probe,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        self.client.send(method, uri, token, body).await
    }

    pub async fn raw(&self, request: Request<Body>) -> Response {
        self.client.raw(request).await
    }

    pub async fn login(&self, username: &str) -> String {
        self.client.login(username).await
    }
}

pub struct Response {
    pub status: StatusCode,
    pub www_authenticate: Option<String>,
    pub content_type: Option<String>,
    pub text: String,
    /// Parsed body for JSON responses, `Null` otherwise.
    pub json: Value,
}

pub fn item_body(sku: &str, category: &str, stock_status: &str) -> Value {
    serde_json::json!({
        "sku": sku,
        "name": format!("name of {}", sku),
        "category": category,
        "tags": "gadget, tech",
        "stock_status": stock_status,
        "available_stock": 50
    })
}
