use chrono::{NaiveDate, NaiveDateTime};

use super::*;

fn at(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .unwrap()
}

fn seeded() -> LocalRepository {
    LocalRepository::with_seed(MockSeed::default_dataset(at(5, 12)))
}

#[tokio::test]
async fn test_new_repository_is_empty_and_healthy() {
    let repo = LocalRepository::new();
    assert!(repo.health_check().await.unwrap());
    assert!(repo.list_users().await.unwrap().is_empty());
    assert!(repo.list_channels().await.unwrap().is_empty());
    assert_eq!(repo.event_count(), 0);
}

#[tokio::test]
async fn test_with_seed_loads_everything() {
    let repo = seeded();
    assert_eq!(repo.user_count(), 3);
    assert_eq!(repo.channel_count(), 2);

    let users = repo.list_users().await.unwrap();
    let ids: Vec<i64> = users.iter().map(|u| u.id.value()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let history = repo.channel_history("general").await.unwrap();
    assert!(!history.is_empty());
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let repo = seeded();
    let err = repo.get_user(UserId::new(99)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
    assert_eq!(err.context().entity.as_deref(), Some("user"));
}

#[tokio::test]
async fn test_update_user_syncs_channel_members() {
    let repo = seeded();
    let update = UserUpdate {
        user_name: "Suzuki Hanako".to_string(),
        grade: 3,
        channels: vec!["dev".to_string()],
    };
    let user = repo.update_user(UserId::new(2), update).await.unwrap();
    assert_eq!(user.user_name, "Suzuki Hanako");
    assert_eq!(user.channels, vec!["dev".to_string()]);

    let general = repo.get_channel("general").await.unwrap();
    let dev = repo.get_channel("dev").await.unwrap();
    assert!(!general.members.contains(&"U002".to_string()));
    assert!(dev.members.contains(&"U002".to_string()));
}

#[tokio::test]
async fn test_update_user_rejects_unknown_channel() {
    let repo = seeded();
    let update = UserUpdate {
        user_name: "Sato".to_string(),
        grade: 3,
        channels: vec!["general".to_string(), "random".to_string()],
    };
    let err = repo.update_user(UserId::new(1), update).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));

    // Nothing changed
    let user = repo.get_user(UserId::new(1)).await.unwrap();
    assert_eq!(user.channels, vec!["general".to_string(), "dev".to_string()]);
}

#[tokio::test]
async fn test_delete_user_removes_channel_membership() {
    let repo = seeded();
    let removed = repo.delete_user(UserId::new(1)).await.unwrap();
    assert_eq!(removed.user_key, "U001");
    assert_eq!(repo.user_count(), 2);

    for channel in repo.list_channels().await.unwrap() {
        assert!(!channel.members.contains(&"U001".to_string()));
    }

    let err = repo.delete_user(UserId::new(1)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_update_channel_members_syncs_users() {
    let repo = seeded();
    let channel = repo
        .update_channel_members(
            "general",
            vec!["U003".to_string(), "U001".to_string(), "U003".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(channel.members, vec!["U003".to_string(), "U001".to_string()]);

    let suzuki = repo.get_user(UserId::new(2)).await.unwrap();
    let tanaka = repo.get_user(UserId::new(3)).await.unwrap();
    assert!(suzuki.channels.is_empty());
    assert_eq!(tanaka.channels, vec!["dev".to_string(), "general".to_string()]);
}

#[tokio::test]
async fn test_update_channel_members_rejects_unknown_users() {
    let repo = seeded();
    let err = repo
        .update_channel_members("dev", vec!["U001".to_string(), "U404".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
    assert!(err.message().contains("U404"));

    let err = repo
        .update_channel_members("random", vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[tokio::test]
async fn test_append_history_keeps_order() {
    let repo = LocalRepository::with_seed(MockSeed {
        channels: vec![Channel {
            channel_id: "C1".to_string(),
            channel_name: "c1".to_string(),
            members: vec![],
        }],
        ..MockSeed::empty()
    });

    let stored = repo
        .append_history(
            "C1",
            vec![
                Event::new("A", "C1", at(5, 10), "late"),
                Event::new("B", "C1", at(5, 9), "early"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(stored, 2);
    repo.append_history("C1", vec![Event::new("C", "C1", at(5, 9), "tie")])
        .await
        .unwrap();

    let texts: Vec<String> = repo
        .channel_history("C1")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert_eq!(texts, vec!["early", "tie", "late"]);
}

#[tokio::test]
async fn test_append_history_errors() {
    let repo = seeded();
    let err = repo
        .append_history("random", vec![Event::new("A", "random", at(5, 9), "x")])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));

    let err = repo
        .append_history("general", vec![Event::new("A", "dev", at(5, 9), "x")])
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_unhealthy_store_is_unavailable() {
    let repo = seeded();
    repo.set_healthy(false);
    assert!(!repo.health_check().await.unwrap());
    let err = repo.list_users().await.unwrap_err();
    assert!(matches!(err, RepositoryError::Unavailable { .. }));
    assert_eq!(err.context().operation.as_deref(), Some("list_users"));
}

#[tokio::test]
async fn test_reset_and_clear_share_state_across_clones() {
    let repo = seeded();
    let clone = repo.clone();

    repo.clear();
    assert_eq!(clone.user_count(), 0);
    assert_eq!(clone.event_count(), 0);

    LifecycleRepository::reset(&clone, MockSeed::default_dataset(at(5, 12)))
        .await
        .unwrap();
    assert_eq!(repo.user_count(), 3);
    assert!(repo.event_count() > 0);
}

#[tokio::test]
async fn test_seed_events_for_unknown_channels_are_dropped() {
    let repo = LocalRepository::with_seed(MockSeed {
        history: vec![Event::new("A", "ghost", at(5, 9), "boo")],
        ..MockSeed::empty()
    });
    assert_eq!(repo.event_count(), 0);
}
