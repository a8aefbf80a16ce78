//! A local stand-in for the Calendar API and the OAuth token endpoint.
//!
//! Serves a fixed set of events, accepts the same requests the backend makes
//! and records them for assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Value, json};

use crate::config::GoogleSettings;
use crate::session::AssertionClaims;

pub const ACCESS_TOKEN: &str = "ya29.stand-in";
pub const REVOKED_REFRESH_TOKEN: &str = "revoked";
pub const CREATED_ID: &str = "created-1";

const SERVICE_ACCOUNT_PUBLIC_KEY: &str = include_str!("../testdata/service_account_key.pub.pem");

#[derive(Debug, Default)]
pub struct Recorded {
    pub token_requests: Vec<HashMap<String, String>>,
    pub assertions: Vec<AssertionClaims>,
    pub authorizations: Vec<String>,
    pub list_queries: Vec<HashMap<String, String>>,
    pub calendar_lookups: usize,
    pub inserted: Vec<Value>,
}

#[derive(Clone)]
pub struct StandIn {
    time_zone: Option<String>,
    events: Arc<Vec<Value>>,
    recorded: Arc<Mutex<Recorded>>,
}

impl StandIn {
    pub fn new(time_zone: Option<&str>, events: Vec<Value>) -> Self {
        StandIn {
            time_zone: time_zone.map(str::to_string),
            events: Arc::new(events),
            recorded: Arc::default(),
        }
    }

    pub fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }

    /// Listen on an ephemeral port and return settings pointing at it.
    pub async fn start(&self) -> GoogleSettings {
        let app = Router::new()
            .route("/token", post(token))
            .route("/calendar/v3/calendars/{calendar_id}", get(calendar))
            .route(
                "/calendar/v3/calendars/{calendar_id}/events",
                get(list_events).post(insert_event),
            )
            .route(
                "/calendar/v3/calendars/{calendar_id}/events/{event_id}",
                get(get_event),
            )
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        GoogleSettings {
            api_url: format!("http://{addr}/calendar/v3"),
            token_url: format!("http://{addr}/token"),
            timeout: Duration::from_secs(5),
        }
    }
}

fn api_error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": { "code": status.as_u16(), "message": message } });
    (status, Json(body)).into_response()
}

fn authorize(stand_in: &StandIn, headers: &HeaderMap) -> Result<(), Response> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let valid = authorization == format!("Bearer {ACCESS_TOKEN}");
    stand_in.recorded().authorizations.push(authorization);

    if valid {
        Ok(())
    } else {
        Err(api_error(StatusCode::UNAUTHORIZED, "Invalid Credentials"))
    }
}

fn verify_assertion(assertion: &str) -> Option<AssertionClaims> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_aud = false;
    let key = DecodingKey::from_rsa_pem(SERVICE_ACCOUNT_PUBLIC_KEY.as_bytes()).ok()?;
    jsonwebtoken::decode(assertion, &key, &validation)
        .ok()
        .map(|data| data.claims)
}

async fn token(State(stand_in): State<StandIn>, Form(form): Form<HashMap<String, String>>) -> Response {
    let granted = match form.get("grant_type").map(String::as_str) {
        Some("refresh_token") => {
            form.get("refresh_token").map(String::as_str) != Some(REVOKED_REFRESH_TOKEN)
        }
        Some("urn:ietf:params:oauth:grant-type:jwt-bearer") => {
            match form.get("assertion").and_then(|a| verify_assertion(a)) {
                Some(claims) => {
                    stand_in.recorded().assertions.push(claims);
                    true
                }
                None => false,
            }
        }
        _ => false,
    };
    stand_in.recorded().token_requests.push(form);

    if !granted {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response();
    }
    Json(json!({ "access_token": ACCESS_TOKEN, "expires_in": 3599, "token_type": "Bearer" }))
        .into_response()
}

async fn calendar(
    State(stand_in): State<StandIn>,
    Path(calendar_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = authorize(&stand_in, &headers) {
        return rejected;
    }
    stand_in.recorded().calendar_lookups += 1;
    Json(json!({ "id": calendar_id, "timeZone": stand_in.time_zone })).into_response()
}

async fn list_events(
    State(stand_in): State<StandIn>,
    Path(_calendar_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = authorize(&stand_in, &headers) {
        return rejected;
    }
    stand_in.recorded().list_queries.push(query);
    Json(json!({ "timeZone": stand_in.time_zone, "items": &*stand_in.events })).into_response()
}

async fn get_event(
    State(stand_in): State<StandIn>,
    Path((_calendar_id, event_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejected) = authorize(&stand_in, &headers) {
        return rejected;
    }
    match stand_in.events.iter().find(|e| e["id"] == event_id.as_str()) {
        Some(event) => Json(event.clone()).into_response(),
        None => api_error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn insert_event(
    State(stand_in): State<StandIn>,
    Path(_calendar_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = authorize(&stand_in, &headers) {
        return rejected;
    }

    let mut created = body.clone();
    stand_in.recorded().inserted.push(body);

    created["id"] = json!(CREATED_ID);
    created["status"] = json!("confirmed");
    created["created"] = json!("2016-10-01T09:00:00.000Z");
    created["htmlLink"] = json!(format!("https://calendar.google.com/event?eid={CREATED_ID}"));
    Json(created).into_response()
}
