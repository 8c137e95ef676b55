//! Live tally feed tests, driving the subscriber map directly the way the
//! WebSocket handler does.

mod common;

use common::*;
use ideahub::handlers::feed_handlers;
use ideahub::models::idea;
use ideahub::votes::coordinator;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_vote_pushes_updated_tally_to_subscriber() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let voter_id = create_voter(pool, "feed_push").await;
    let idea_id = create_idea(pool, "Quiet car pilot", "Zurich, Switzerland", voter_id).await;
    set_votes(pool, idea_id, 3).await;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    feed_handlers::subscribe(&subs, tx, None);

    coordinator::cast_vote(pool, &subs, voter_id, idea_id)
        .await
        .expect("vote should succeed");

    // The subscriber observes the new tally without re-querying the store.
    let frame = rx.recv().await.expect("a frame should arrive");
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["type"], "idea_updated");
    assert_eq!(value["idea"]["id"], idea_id);
    assert_eq!(value["idea"]["votes"], 4);

    println!("[PASS] test_vote_pushes_updated_tally_to_subscriber");
}

#[tokio::test]
async fn test_region_scoped_subscription_filters_frames() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let voter_a = create_voter(pool, "feed_scope_a").await;
    let voter_b = create_voter(pool, "feed_scope_b").await;
    let tokyo = create_idea(pool, "Tokyo idea", "Tokyo, Japan", voter_a).await;
    let berlin = create_idea(pool, "Berlin idea", "Berlin, Germany", voter_a).await;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    feed_handlers::subscribe(&subs, tx, Some("Tokyo, Japan".to_string()));

    coordinator::cast_vote(pool, &subs, voter_a, berlin)
        .await
        .expect("berlin vote");
    coordinator::cast_vote(pool, &subs, voter_b, tokyo)
        .await
        .expect("tokyo vote");

    // Only the Tokyo frame is delivered to the scoped subscriber.
    let frame = rx.recv().await.expect("a frame should arrive");
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["idea"]["id"], tokyo);
    assert!(rx.try_recv().is_err(), "no frame for the other region");
}

#[tokio::test]
async fn test_created_frames_and_closed_subscriber_pruning() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let submitter = create_voter(pool, "feed_prune").await;

    let (tx_keep, mut rx_keep) = mpsc::unbounded_channel::<String>();
    let (tx_gone, rx_gone) = mpsc::unbounded_channel::<String>();
    feed_handlers::subscribe(&subs, tx_keep, None);
    feed_handlers::subscribe(&subs, tx_gone, None);
    assert_eq!(subs.read().unwrap().len(), 2);

    // One subscriber disconnects
    drop(rx_gone);

    let created = idea::create(
        pool,
        &ideahub::models::idea::NewIdea {
            title: "Window seats".to_string(),
            description: "Reserve window seats fairly".to_string(),
            kind: "individual".to_string(),
            region: Some("Montreal, Canada".to_string()),
            team_name: None,
        },
        submitter,
    )
    .await
    .unwrap();
    feed_handlers::publish_created(&subs, &created);

    let frame = rx_keep.recv().await.expect("surviving subscriber gets the frame");
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["type"], "idea_created");
    assert_eq!(value["idea"]["votes"], 0);
    assert_eq!(value["idea"]["type"], "individual");

    assert_eq!(
        subs.read().unwrap().len(),
        1,
        "publishing prunes closed subscribers"
    );
}

#[tokio::test]
async fn test_per_document_frames_arrive_in_publish_order() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let submitter = create_voter(pool, "feed_order_s").await;
    let voter_b = create_voter(pool, "feed_order_b").await;
    let idea_id = create_idea(pool, "Order check", "Seoul, South Korea", submitter).await;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    feed_handlers::subscribe(&subs, tx, None);

    coordinator::cast_vote(pool, &subs, submitter, idea_id)
        .await
        .expect("first vote");
    coordinator::cast_vote(pool, &subs, voter_b, idea_id)
        .await
        .expect("second vote");

    let first: serde_json::Value =
        serde_json::from_str(&rx.recv().await.expect("first frame")).unwrap();
    let second: serde_json::Value =
        serde_json::from_str(&rx.recv().await.expect("second frame")).unwrap();
    assert_eq!(first["idea"]["votes"], 1);
    assert_eq!(second["idea"]["votes"], 2, "updates for one document stay ordered");
}
