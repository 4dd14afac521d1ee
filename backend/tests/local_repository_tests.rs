//! Concurrency and lifecycle tests for the in-memory store.

mod support;

use std::sync::Arc;

use seelack::db::repository::{ChannelRepository, HistoryRepository, UserRepository};
use seelack::db::services;
use seelack::models::{Event, Scale, UserId};
use support::{at, empty_channels, seeded_repository};

#[tokio::test]
async fn test_concurrent_appends_are_all_stored() {
    let repo = Arc::new(empty_channels(&["C1", "C2"]));

    let mut handles = vec![];
    for task in 0..8u32 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let channel = if task % 2 == 0 { "C1" } else { "C2" };
            for i in 0..25u32 {
                let event = Event::new(
                    format!("U{}", task),
                    channel,
                    at(1 + (i % 5), task + 1, i),
                    "msg",
                );
                repo.append_history(channel, vec![event]).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(repo.event_count(), 200);
    let c1 = repo.channel_history("C1").await.unwrap();
    assert_eq!(c1.len(), 100);
    assert!(c1.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn test_aggregation_runs_on_snapshots_during_writes() {
    let repo = Arc::new(empty_channels(&["C1"]));

    let writer = {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            for minute in 0..50u32 {
                let event = Event::new("A", "C1", at(5, 9, minute), "tick");
                repo.append_history("C1", vec![event]).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    let mut last_total = 0usize;
    for _ in 0..20 {
        let buckets = services_activity(&repo).await;
        assert_eq!(buckets.len(), 24);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        // Counts only grow as writes land
        assert!(total >= last_total);
        last_total = total;
        tokio::task::yield_now().await;
    }

    writer.await.unwrap();
    let buckets = services_activity(&repo).await;
    assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 50);
}

async fn services_activity(
    repo: &seelack::db::LocalRepository,
) -> Vec<seelack::models::Bucket> {
    services::channel_activity(repo, "C1", Scale::Day, at(5, 12, 0))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_concurrent_directory_edits_stay_consistent() {
    let repo = Arc::new(seeded_repository());

    let mut handles = vec![];
    for round in 0..10 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let members = if round % 2 == 0 {
                vec!["U001".to_string(), "U003".to_string()]
            } else {
                vec!["U002".to_string()]
            };
            repo.update_channel_members("dev", members).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Whatever write landed last, both sides of the relation agree
    let dev = repo.get_channel("dev").await.unwrap();
    for user in repo.list_users().await.unwrap() {
        let in_channel = dev.members.contains(&user.user_key);
        let has_channel = user.channels.iter().any(|c| c == "dev");
        assert_eq!(in_channel, has_channel, "user {}", user.user_key);
    }
}

#[tokio::test]
async fn test_clear_then_reseed() {
    let repo = seeded_repository();
    repo.clear();
    assert_eq!(repo.user_count(), 0);
    assert!(repo.get_user(UserId::new(1)).await.is_err());
    assert!(repo.channel_history("general").await.is_err());

    services::initialize(&repo, at(5, 12, 0)).await.unwrap();
    assert_eq!(repo.user_count(), 3);
    assert!(!repo.channel_history("general").await.unwrap().is_empty());
}
