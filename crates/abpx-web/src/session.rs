//! Per-visitor session state, keyed by a random id carried in a cookie.
//!
//! A session holds one submission cycle: the screened entries, any folded
//! structures and the pager position. Sessions are created on first contact
//! and evicted after `session.ttl_secs` without a request.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Cookie, HeaderMapExt};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use abpx_peptide::ScreenedPeptide;
use abpx_structure::StructureOutcome;

use crate::state::SharedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Input,
    Output,
}

#[derive(Debug)]
pub struct Session {
    pub page: Page,
    pub submit_count: u32,
    pub results: Vec<ScreenedPeptide>,
    pub structures: Vec<StructureOutcome>,
    /// Position among the successfully folded structures.
    pub structure_pos: usize,
    /// Bumped whenever results are replaced or discarded.
    cycle: u64,
    last_seen: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            page: Page::Input,
            submit_count: 0,
            results: Vec::new(),
            structures: Vec::new(),
            structure_pos: 0,
            cycle: 0,
            last_seen: Instant::now(),
        }
    }
}

impl Session {
    /// Start a new output cycle with fresh results.
    pub fn show_results(&mut self, results: Vec<ScreenedPeptide>) {
        self.results = results;
        self.structures.clear();
        self.structure_pos = 0;
        self.page = Page::Output;
        self.cycle += 1;
    }

    /// Return to the input page, discarding the cycle's results.
    pub fn back(&mut self) {
        self.page = Page::Input;
        self.results.clear();
        self.structures.clear();
        self.structure_pos = 0;
        self.cycle += 1;
    }

    /// Identifies the current submission cycle.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Attach structures folded for `cycle`. Returns false, leaving the
    /// session untouched, when the results have changed since.
    pub fn attach_structures(&mut self, cycle: u64, structures: Vec<StructureOutcome>) -> bool {
        if cycle != self.cycle {
            return false;
        }
        self.set_structures(structures);
        true
    }

    pub fn set_structures(&mut self, structures: Vec<StructureOutcome>) {
        self.structures = structures;
        self.structure_pos = 0;
    }

    /// Successfully folded structures, in input order.
    pub fn folded(&self) -> Vec<&StructureOutcome> {
        self.structures.iter().filter(|o| o.payload().is_some()).collect()
    }

    /// The structure the pager points at, with its 1-based position and the total.
    pub fn current_structure(&self) -> Option<(usize, usize, &StructureOutcome)> {
        let folded = self.folded();
        let total = folded.len();
        folded
            .get(self.structure_pos % total.max(1))
            .map(|o| (self.structure_pos % total + 1, total, *o))
    }

    pub fn next_structure(&mut self) {
        let total = self.folded().len();
        if total > 0 {
            self.structure_pos = (self.structure_pos + 1) % total;
        }
    }

    pub fn prev_structure(&mut self) {
        let total = self.folded().len();
        if total > 0 {
            self.structure_pos = (self.structure_pos + total - 1) % total;
        }
    }
}

/// In-memory session map.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Run `f` on the session for `id`, creating it if needed.
    pub async fn with<F, R>(&self, id: Uuid, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(id).or_default();
        session.last_seen = Instant::now();
        f(session)
    }

    /// Drop sessions idle for longer than the TTL. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, s| s.last_seen.elapsed() <= ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Session id attached to every request by [`session_layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Middleware: resolve the session cookie, minting a new id when absent or malformed.
pub async fn session_layer(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.as_str();
    let existing = req
        .headers()
        .typed_get::<Cookie>()
        .and_then(|c| c.get(cookie_name).and_then(|v| Uuid::parse_str(v).ok()));

    let (id, fresh) = match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };
    req.extensions_mut().insert(SessionId(id));

    let mut response = next.run(req).await;
    if fresh {
        debug!("New session {}", id);
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// Periodically evict idle sessions.
pub fn spawn_session_sweeper(state: SharedState) -> JoinHandle<()> {
    let period = Duration::from_secs((state.config.session.ttl_secs / 4).clamp(1, 300));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = state.sessions.evict_idle().await;
            if evicted > 0 {
                info!("Evicted {} idle sessions", evicted);
            }
        }
    })
}
