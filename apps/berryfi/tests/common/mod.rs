//! A local stand-in for the Fibery command endpoint.

#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Json;
use berryfi::BerryfiConfig;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&Value) -> (StatusCode, Value) + Send + Sync;

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct Shared {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// A running mock server.
pub struct MockFibery {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockFibery {
    /// Start a server on an ephemeral port answering with `responder`.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Value) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shared = Shared {
            responder: Arc::new(responder),
            requests: Arc::clone(&requests),
        };
        let router = Router::new()
            .route("/api/commands", post(handle))
            .with_state(shared);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            requests,
        }
    }

    /// Client configuration pointing at this server.
    pub fn config(&self) -> BerryfiConfig {
        BerryfiConfig {
            base_url: Some(self.base_url.clone()),
            ..BerryfiConfig::new("acme", "secret-token")
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

async fn handle(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    shared
        .requests
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(Recorded {
            headers,
            body: body.clone(),
        });
    let (status, reply) = (shared.responder)(&body);
    (status, Json(reply))
}

/// Name of the first command in a request body.
pub fn first_command(body: &Value) -> &str {
    body[0]["command"].as_str().unwrap_or_default()
}

/// A schema with one user type, `Sales/Deal`.
pub fn schema() -> Value {
    json!({
        "fibery/id": "ws-42",
        "fibery/version": "3",
        "fibery/meta": {"fibery/version": "1", "fibery/rel-version": "2020-06", "fibery/maintenance?": false},
        "fibery/types": [
            {
                "fibery/id": "p-text",
                "fibery/name": {"fibery/name": "fibery/text", "fibery/primitive?": true}
            },
            {
                "fibery/id": "t-deal",
                "fibery/name": "Sales/Deal",
                "fibery/meta": {"fibery/domain?": true},
                "fibery/fields": [
                    {
                        "fibery/id": "f-id",
                        "fibery/name": "fibery/id",
                        "fibery/type": "fibery/uuid",
                        "fibery/meta": {"fibery/readonly?": true}
                    },
                    {
                        "fibery/id": "f-name",
                        "fibery/name": "Sales/Name",
                        "fibery/type": "fibery/text"
                    },
                    {
                        "fibery/id": "f-amount",
                        "fibery/name": "Sales/Amount",
                        "fibery/type": "fibery/decimal"
                    }
                ]
            }
        ]
    })
}

/// Answer schema queries with [`schema`] and creates by echoing the entity.
pub fn fibery_like(body: &Value) -> (StatusCode, Value) {
    let commands = body.as_array().cloned().unwrap_or_default();
    let outcomes: Vec<Value> = commands
        .iter()
        .map(|command| match command["command"].as_str() {
            Some("fibery.schema/query") => json!({"success": true, "result": schema()}),
            Some("fibery.entity/create") => {
                json!({"success": true, "result": command["args"]["entity"].clone()})
            }
            Some("fibery.entity/update") => {
                json!({"success": false, "result": {"message": "entity is locked"}})
            }
            _ => json!({"success": false, "result": {"message": "unknown command"}}),
        })
        .collect();
    (StatusCode::OK, Value::Array(outcomes))
}
