use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amphibian {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub img_src: String,
}

impl Amphibian {
    pub fn new(name: &str, kind: &str, description: &str, img_src: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
            img_src: img_src.to_string(),
        }
    }
}

/// What `GET /amphibians` answers with.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// 200 with the list serialized as a JSON array, in order.
    Serve(Vec<Amphibian>),
    /// 200 with a body that is not the expected JSON shape.
    Malformed,
    /// The given status code with an empty body.
    Status(u16),
}

/// Shared, mutable server state. Tests hold an `Arc` to it and rewrite the
/// behavior between requests to script failure and recovery.
#[derive(Debug)]
pub struct MockState {
    pub behavior: RwLock<Behavior>,
    pub delay: RwLock<Option<Duration>>,
    hits: AtomicU64,
}

impl MockState {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior: RwLock::new(behavior),
            delay: RwLock::new(None),
            hits: AtomicU64::new(0),
        }
    }

    pub async fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.write().await = behavior;
    }

    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write().await = delay;
    }

    /// Number of `GET /amphibians` requests served so far.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(Behavior::Serve(seed_catalog()))
    }
}

const IMG_BASE: &str = "https://developer.android.com/codelabs/basic-android-kotlin-compose-amphibians-app/img";

/// The catalog served by a freshly started server.
pub fn seed_catalog() -> Vec<Amphibian> {
    vec![
        Amphibian::new(
            "Great Basin Spadefoot",
            "Toad",
            "This toad spends most of its life underground due to the arid desert conditions in which it lives.",
            &format!("{IMG_BASE}/great-basin-spadefoot.png"),
        ),
        Amphibian::new(
            "Roraima Bush Toad",
            "Toad",
            "This toad is typically found in South America. Its dark body allows it to blend in with its surroundings.",
            &format!("{IMG_BASE}/roraima-bush-toad.png"),
        ),
        Amphibian::new(
            "Pacific Chorus Frog",
            "Frog",
            "Also known as the Pacific Treefrog, it is the most common frog on the Pacific Coast of North America.",
            &format!("{IMG_BASE}/pacific-chorus-frog.png"),
        ),
        Amphibian::new(
            "Blue Jeans Frog",
            "Frog",
            "Sometimes called the strawberry poison-dart frog, this little amphibian is identifiable by its bright red body and blue legs.",
            &format!("{IMG_BASE}/blue-jeans-frog.png"),
        ),
        Amphibian::new(
            "Tiger Salamander",
            "Salamander",
            "Tiger salamanders are named for their distinctive stripes and spend most of the year in burrows.",
            &format!("{IMG_BASE}/tiger-salamander.png"),
        ),
        Amphibian::new(
            "Rough-skinned Newt",
            "Newt",
            "This newt secretes a potent neurotoxin from its skin, which keeps most predators away.",
            &format!("{IMG_BASE}/rough-skinned-newt.png"),
        ),
    ]
}

pub fn app() -> Router {
    app_with_state(Arc::new(MockState::default()))
}

pub fn app_with_state(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/amphibians", get(list_amphibians))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: Arc<MockState>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn list_amphibians(State(state): State<Arc<MockState>>) -> Response {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst) + 1;

    let delay = *state.delay.read().await;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let behavior = state.behavior.read().await.clone();
    tracing::debug!(hit, ?behavior, "GET /amphibians");

    match behavior {
        Behavior::Serve(amphibians) => Json(amphibians).into_response(),
        Behavior::Malformed => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"amphibians": "not a list"}"#,
        )
            .into_response(),
        Behavior::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
    }
}
