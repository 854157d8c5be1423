//! Shared fixtures for ABP-Xplorer tests: a tiny forest model and an
//! in-process stand-in for the folding service.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use abpx_peptide::classifier::DecisionTree;
use abpx_peptide::ForestClassifier;
use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Router};

/// Forest of two stumps: bond count above 150 and sulfur share above 1%
/// each push towards the antibacterial class.
pub fn tiny_forest() -> ForestClassifier {
    let stump = |feature: i64, threshold: f64| DecisionTree {
        children_left: vec![1, -1, -1],
        children_right: vec![2, -1, -1],
        feature: vec![feature, -2, -2],
        threshold: vec![threshold, -2.0, -2.0],
        value: vec![[10.0, 10.0], [7.0, 3.0], [2.0, 8.0]],
    };
    ForestClassifier::new(vec![stump(5, 150.0), stump(4, 0.01)])
        .expect("fixture forest is well-formed")
}

/// A request the stub received.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedFold {
    pub content_type: Option<String>,
    pub body: String,
}

type Log = Arc<Mutex<Vec<ReceivedFold>>>;

/// Handle to a running folding stub.
///
/// Behaviour by request body:
/// - starts with `FAIL`  → 500
/// - starts with `SLEEP` → answers after 3 s
/// - anything else       → 200 with one ATOM record per residue
pub struct FoldStub {
    pub addr: SocketAddr,
    log: Log,
}

impl FoldStub {
    pub fn endpoint(&self) -> String {
        format!("http://{}/foldSequence/v1/pdb/", self.addr)
    }

    pub fn received(&self) -> Vec<ReceivedFold> {
        self.log.lock().expect("stub log poisoned").clone()
    }
}

/// PDB text the stub returns for `sequence`.
pub fn stub_pdb(sequence: &str) -> String {
    let mut pdb = format!("HEADER    STUB {}\n", sequence);
    for (i, residue) in sequence.chars().enumerate() {
        pdb.push_str(&format!(
            "ATOM  {:>5}  CA  {}   A{:>4}\n",
            i + 1,
            residue,
            i + 1
        ));
    }
    pdb.push_str("END\n");
    pdb
}

async fn fold(State(log): State<Log>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    log.lock()
        .expect("stub log poisoned")
        .push(ReceivedFold { content_type, body: body.clone() });

    if body.starts_with("FAIL") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model crashed".to_string());
    }
    if body.starts_with("SLEEP") {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    (StatusCode::OK, stub_pdb(&body))
}

/// Start the stub on an ephemeral 127.0.0.1 port.
pub async fn spawn_fold_stub() -> FoldStub {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/foldSequence/v1/pdb/", post(fold))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    FoldStub { addr, log }
}
