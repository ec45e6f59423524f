//! In-process registry backend for tests
//!
//! Serves the registry routes from memory on a random local port. Every
//! request is counted so tests can assert that nothing was sent.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use common::config::ApiConfig;
use common::dates::parse_calendar_date;
use common::models::{
    Address, AddressId, AddressPayload, AddressType, Gender, User, UserId, UserRegistration,
    UserUpdate,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::user_service::UserService;

#[derive(Default)]
struct Store {
    users: BTreeMap<UserId, User>,
    last_user_id: UserId,
    last_address_id: AddressId,
    requests: usize,
    fail_deletes: bool,
    empty_address_replies: bool,
    registration_rejection: Option<Value>,
}

impl Store {
    fn insert_user(&mut self, mut user: User) -> User {
        self.last_user_id += 1;
        user.id = self.last_user_id;
        self.users.insert(user.id, user.clone());
        user
    }

    fn push_address(&mut self, user_id: UserId, payload: AddressPayload) -> Option<User> {
        self.last_address_id += 1;
        let address_id = self.last_address_id;
        let user = self.users.get_mut(&user_id)?;
        user.addresses.push(Address {
            id: address_id,
            address_type: payload.address_type,
            address_text: payload.address_text,
        });
        Some(user.clone())
    }
}

type Shared = Arc<Mutex<Store>>;
type ApiError = (StatusCode, Json<Value>);

/// Handle on a running fake backend
pub struct FakeBackend {
    store: Shared,
    base_url: String,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let store = Shared::default();
        let app = create_router(store.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake backend");
        let addr = listener.local_addr().expect("fake backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend stopped");
        });

        Self {
            store,
            base_url: format!("http://{addr}/api"),
        }
    }

    /// Client pointed at this backend
    pub fn service(&self) -> UserService {
        let config = ApiConfig::default()
            .with_base_url(self.base_url.as_str())
            .expect("fake backend url is valid");
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("failed to build client");
        UserService::with_client(client, &config.base_url)
    }

    /// Client pointed at a port nobody listens on
    pub fn unreachable_service(&self) -> UserService {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let addr = listener.local_addr().expect("no local address");
        drop(listener);

        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("failed to build client");
        UserService::with_client(client, &format!("http://{addr}/api"))
    }

    /// Store a user directly, bypassing HTTP
    pub async fn seed(&self, name: &str, surname: &str, gender: Gender, birthdate: &str) -> User {
        let user = User {
            id: 0,
            name: name.to_string(),
            surname: surname.to_string(),
            gender,
            birthdate: parse_calendar_date(birthdate).expect("invalid seed birthdate"),
            addresses: Vec::new(),
        };
        self.store.lock().await.insert_user(user)
    }

    /// Attach an address directly, bypassing HTTP
    pub async fn seed_address(&self, user_id: UserId, address_type: AddressType, text: &str) -> User {
        let payload = AddressPayload {
            address_type,
            address_text: text.to_string(),
        };
        self.store
            .lock()
            .await
            .push_address(user_id, payload)
            .expect("seeded address for unknown user")
    }

    pub async fn user(&self, id: UserId) -> Option<User> {
        self.store.lock().await.users.get(&id).cloned()
    }

    /// Number of HTTP requests served so far
    pub async fn requests(&self) -> usize {
        self.store.lock().await.requests
    }

    /// Make every user delete answer 500
    pub async fn fail_deletes(&self) {
        self.store.lock().await.fail_deletes = true;
    }

    /// Answer address creation with an empty 201
    pub async fn empty_address_replies(&self) {
        self.store.lock().await.empty_address_replies = true;
    }

    /// Make every registration answer 400 with `body`
    pub async fn reject_registrations(&self, body: Value) {
        self.store.lock().await.registration_rejection = Some(body);
    }
}

fn create_router(store: Shared) -> Router {
    Router::new()
        .route("/api/users", get(get_users))
        .route("/api/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/api/register-user", post(register_user))
        .route("/api/users/:id/addresses", post(add_address))
        .route(
            "/api/users/:id/addresses/:address_id",
            put(update_address).delete(delete_address),
        )
        .layer(middleware::from_fn_with_state(store.clone(), count_requests))
        .with_state(store)
}

async fn count_requests(State(store): State<Shared>, request: Request, next: Next) -> Response {
    store.lock().await.requests += 1;
    next.run(request).await
}

fn user_not_found(id: UserId) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("User not found with id: {id}") })),
    )
}

async fn get_users(State(store): State<Shared>) -> Json<Vec<User>> {
    Json(store.lock().await.users.values().cloned().collect())
}

async fn get_user(
    State(store): State<Shared>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    let store = store.lock().await;
    store
        .users
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| user_not_found(id))
}

async fn register_user(
    State(store): State<Shared>,
    Json(registration): Json<UserRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = store.lock().await;
    if let Some(body) = store.registration_rejection.clone() {
        return Err((StatusCode::BAD_REQUEST, Json(body)));
    }
    if registration.name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "name": "Name is required" } })),
        ));
    }

    let mut addresses = Vec::new();
    for (address_type, text) in [
        (AddressType::Work, &registration.work_address),
        (AddressType::Home, &registration.home_address),
    ] {
        if !text.trim().is_empty() {
            store.last_address_id += 1;
            addresses.push(Address {
                id: store.last_address_id,
                address_type,
                address_text: text.clone(),
            });
        }
    }

    let user = store.insert_user(User {
        id: 0,
        name: registration.name,
        surname: registration.surname,
        gender: registration.gender,
        birthdate: registration.birthdate,
        addresses,
    });
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(store): State<Shared>,
    Path(id): Path<UserId>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    let mut store = store.lock().await;
    let user = store.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
    user.name = update.name;
    user.surname = update.surname;
    user.gender = update.gender;
    user.birthdate = update.birthdate;
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(store): State<Shared>,
    Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
    let mut store = store.lock().await;
    if store.fail_deletes {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Internal server error" })),
        ));
    }
    store
        .users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| user_not_found(id))
}

async fn add_address(
    State(store): State<Shared>,
    Path(id): Path<UserId>,
    Json(payload): Json<AddressPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = store.lock().await;
    let user = store
        .push_address(id, payload)
        .ok_or_else(|| user_not_found(id))?;
    if store.empty_address_replies {
        return Ok(StatusCode::CREATED.into_response());
    }
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

async fn update_address(
    State(store): State<Shared>,
    Path((id, address_id)): Path<(UserId, AddressId)>,
    Json(payload): Json<AddressPayload>,
) -> Result<Json<User>, ApiError> {
    let mut store = store.lock().await;
    let user = store.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
    let address = user
        .addresses
        .iter_mut()
        .find(|address| address.id == address_id)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("Address not found with id: {address_id}") })),
            )
        })?;
    address.address_type = payload.address_type;
    address.address_text = payload.address_text;
    Ok(Json(user.clone()))
}

async fn delete_address(
    State(store): State<Shared>,
    Path((id, address_id)): Path<(UserId, AddressId)>,
) -> Result<StatusCode, ApiError> {
    let mut store = store.lock().await;
    let user = store.users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
    user.addresses.retain(|address| address.id != address_id);
    Ok(StatusCode::NO_CONTENT)
}
