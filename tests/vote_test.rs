//! Integration tests for the vote coordinator.
//!
//! Covers: single vote increments and records, repeat vote rejection,
//! overlapping votes from distinct voters, the same-voter double-cast
//! race, and voting on a missing idea.

mod common;

use common::*;
use ideahub::errors::AppError;
use ideahub::handlers::feed_handlers;
use ideahub::votes::{coordinator, ledger};

#[tokio::test]
async fn test_cast_vote_increments_and_records() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let voter_id = create_voter(pool, "cast").await;
    let idea_id = create_idea(pool, "Solar awnings", "Berlin, Germany", voter_id).await;
    set_votes(pool, idea_id, 3).await;

    coordinator::cast_vote(pool, &subs, voter_id, idea_id)
        .await
        .expect("vote should succeed");

    assert_eq!(current_votes(pool, idea_id).await, 4, "tally should go 3 -> 4");

    let recorded = ledger::get(pool, voter_id).await.expect("ledger read");
    assert!(recorded.contains(&idea_id), "ledger should record the idea");

    println!("[PASS] test_cast_vote_increments_and_records");
}

#[tokio::test]
async fn test_repeat_vote_is_duplicate() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let voter_id = create_voter(pool, "repeat").await;
    let idea_id = create_idea(pool, "Quiet floors", "Tokyo, Japan", voter_id).await;
    set_votes(pool, idea_id, 3).await;

    coordinator::cast_vote(pool, &subs, voter_id, idea_id)
        .await
        .expect("first vote should succeed");
    assert_eq!(current_votes(pool, idea_id).await, 4);

    let second = coordinator::cast_vote(pool, &subs, voter_id, idea_id).await;
    assert!(
        matches!(second, Err(AppError::DuplicateVote)),
        "second vote should be rejected, got {second:?}"
    );

    // No mutation from the rejected attempt
    assert_eq!(current_votes(pool, idea_id).await, 4, "tally must stay at 4");
    assert_eq!(ledger_rows(pool, voter_id).await, 1, "ledger must keep one row");

    println!("[PASS] test_repeat_vote_is_duplicate");
}

#[tokio::test]
async fn test_two_voters_overlapping_both_counted() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let submitter = create_voter(pool, "overlap_submitter").await;
    let voter_b = create_voter(pool, "overlap_b").await;
    let voter_c = create_voter(pool, "overlap_c").await;
    let idea_id = create_idea(pool, "Walking meetings", "Toronto, Canada", submitter).await;
    set_votes(pool, idea_id, 4).await;

    let (res_b, res_c) = tokio::join!(
        coordinator::cast_vote(pool, &subs, voter_b, idea_id),
        coordinator::cast_vote(pool, &subs, voter_c, idea_id),
    );
    res_b.expect("voter B should succeed");
    res_c.expect("voter C should succeed");

    assert_eq!(
        current_votes(pool, idea_id).await,
        6,
        "both overlapping increments must be applied"
    );
    assert_eq!(ledger_rows(pool, voter_b).await, 1);
    assert_eq!(ledger_rows(pool, voter_c).await, 1);

    println!("[PASS] test_two_voters_overlapping_both_counted");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_voters_no_lost_increments() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let submitter = create_voter(pool, "swarm_submitter").await;
    let idea_id = create_idea(pool, "Library swap shelf", "Seattle, USA", submitter).await;

    const N: usize = 6;
    let mut voters = Vec::new();
    for i in 0..N {
        voters.push(create_voter(pool, &format!("swarm_{i}")).await);
    }

    let mut handles = Vec::new();
    for voter_id in voters {
        let pool = pool.clone();
        let subs = subs.clone();
        handles.push(tokio::spawn(async move {
            coordinator::cast_vote(&pool, &subs, voter_id, idea_id).await
        }));
    }
    for handle in handles {
        handle.await.expect("task").expect("each distinct voter should succeed");
    }

    assert_eq!(
        current_votes(pool, idea_id).await,
        N as i64,
        "final tally must equal the number of distinct voters"
    );

    println!("[PASS] test_concurrent_distinct_voters_no_lost_increments");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_voter_double_cast_single_increment() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let voter_id = create_voter(pool, "racer").await;
    let idea_id = create_idea(pool, "Standing desks", "London, United Kingdom", voter_id).await;

    // Same voter, two sessions, overlapping attempts
    let t1 = {
        let pool = pool.clone();
        let subs = subs.clone();
        tokio::spawn(async move { coordinator::cast_vote(&pool, &subs, voter_id, idea_id).await })
    };
    let t2 = {
        let pool = pool.clone();
        let subs = subs.clone();
        tokio::spawn(async move { coordinator::cast_vote(&pool, &subs, voter_id, idea_id).await })
    };

    let results = [t1.await.expect("task"), t2.await.expect("task")];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::DuplicateVote)))
        .count();

    assert_eq!(successes, 1, "exactly one attempt may win");
    assert_eq!(duplicates, 1, "the loser must see a duplicate-vote rejection");
    assert_eq!(current_votes(pool, idea_id).await, 1, "tally must increment once");
    assert_eq!(ledger_rows(pool, voter_id).await, 1);

    println!("[PASS] test_same_voter_double_cast_single_increment");
}

#[tokio::test]
async fn test_vote_for_missing_idea_is_not_found() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let subs = feed_handlers::new_subscriber_map();

    let voter_id = create_voter(pool, "missing").await;

    let result = coordinator::cast_vote(pool, &subs, voter_id, 999_999).await;
    assert!(
        matches!(result, Err(AppError::NotFound)),
        "voting for an unknown idea should be NotFound, got {result:?}"
    );
    assert_eq!(ledger_rows(pool, voter_id).await, 0, "no ledger row may remain");
}
