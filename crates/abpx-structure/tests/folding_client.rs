//! Folding client against the in-process stub service.

use abpx_common::FoldingConfig;
use abpx_structure::{FoldingClient, StructureError};
use abpx_test_utils::{spawn_fold_stub, stub_pdb};

fn config(endpoint: String) -> FoldingConfig {
    FoldingConfig {
        endpoint,
        timeout_secs: 1,
        max_concurrency: 2,
        ..FoldingConfig::default()
    }
}

#[tokio::test]
async fn test_fold_posts_uppercase_form_body() {
    let stub = spawn_fold_stub().await;
    let client = FoldingClient::new(&config(stub.endpoint())).unwrap();

    let payload = client.fold("gIgk").await.unwrap();
    assert_eq!(payload.as_str(), stub_pdb("GIGK"));
    assert_eq!(payload.atom_count(), 4);

    let received = stub.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body, "GIGK");
    assert_eq!(
        received[0].content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
}

#[tokio::test]
async fn test_failure_does_not_stop_following_sequences() {
    let stub = spawn_fold_stub().await;
    let client = FoldingClient::new(&config(stub.endpoint())).unwrap();

    let outcomes = client
        .fold_all(&["KLAK", "FAILKK", "AAAXXX", "GGW"])
        .await;

    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes.iter().map(|o| o.index).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert!(outcomes[0].payload().is_some());
    assert_eq!(outcomes[1].error(), Some(&StructureError::Status(500)));
    assert!(matches!(outcomes[2].error(), Some(StructureError::InvalidSequence(_))));
    assert_eq!(outcomes[3].payload().map(|p| p.atom_count()), Some(3));

    // The invalid entry never reached the service
    assert_eq!(stub.received().len(), 3);
}

#[tokio::test]
async fn test_timeout_is_per_sequence() {
    let stub = spawn_fold_stub().await;
    let client = FoldingClient::new(&config(stub.endpoint())).unwrap();

    let outcomes = client.fold_all(&["SLEEPY", "KWK"]).await;
    assert_eq!(outcomes[0].error(), Some(&StructureError::Timeout(1)));
    assert!(outcomes[1].payload().is_some());
}

#[tokio::test]
async fn test_unlisted_host_is_blocked_without_network() {
    let client = FoldingClient::new(&config("https://fold.example.org/pdb/".into())).unwrap();
    let err = client.fold("KLAK").await.unwrap_err();
    assert!(matches!(err, StructureError::Blocked(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Port 9 on localhost: nothing listens there in CI
    let client = FoldingClient::new(&config("http://127.0.0.1:9/pdb/".into())).unwrap();
    let outcomes = client.fold_all(&["KLAK", "GG"]).await;
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o.error(), Some(StructureError::Transport(_)))));
}

#[tokio::test]
async fn test_fold_all_runs_on_spawned_task() {
    let stub = spawn_fold_stub().await;
    let client = FoldingClient::new(&config(stub.endpoint())).unwrap();
    let sequences = vec!["KLAK".to_string(), "GGW".to_string()];

    // tokio::spawn requires a Send future, as axum handlers do
    let outcomes = tokio::spawn(async move { client.fold_all(&sequences).await })
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[1].sequence, "GGW");
    assert!(outcomes.iter().all(|o| o.payload().is_some()));
}
