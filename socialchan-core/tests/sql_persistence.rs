/*
    sql_persistence.rs - Channel state across reopened SQLite databases
*/

use socialchan_core::config::StoreConfig;
use socialchan_core::core_channel::{
    AccountId, ChannelManager, ChannelPrivacy, ChannelService, ChannelSqlStore, ChannelType,
    StaticAccountDirectory,
};
use std::time::Duration;
use tempfile::tempdir;

fn file_config(path: std::path::PathBuf) -> StoreConfig {
    StoreConfig {
        database_path: Some(path),
        pool_size: 4,
        busy_timeout: Duration::from_millis(500),
    }
}

#[test]
fn test_ownership_and_members_survive_reopen() {
    let dir = tempdir().unwrap();
    let config = file_config(dir.path().join("channels.sqlite3"));
    let alice = AccountId::new("alice");
    let bob = AccountId::new("bob");

    let channel_id = {
        let service = ChannelService::new(
            ChannelSqlStore::open(&config).unwrap(),
            StaticAccountDirectory::with_accounts(["alice", "bob"]),
        );
        let channel = service
            .create_channel(&alice, "testgroup", ChannelType::Topic)
            .unwrap();

        let mut edit = channel.clone();
        edit.name = "announcements".to_string();
        edit.privacy = ChannelPrivacy::Private;
        service.update_channel(&edit, &alice).unwrap();
        service.add_participant(&channel.id, &alice, &bob).unwrap();
        channel.id
    };

    let service = ChannelService::new(
        ChannelSqlStore::open(&config).unwrap(),
        StaticAccountDirectory::with_accounts(["alice", "bob"]),
    );

    let stored = service.get_channel(&channel_id).unwrap();
    assert_eq!(stored.creator_id, alice);
    assert_eq!(stored.name, "announcements");
    assert_eq!(stored.privacy, ChannelPrivacy::Private);
    assert!(service.is_participant(&channel_id, &bob).unwrap());

    // Ownership is still enforced after reopening
    let mut forged = stored.clone();
    forged.creator_id = bob.clone();
    assert!(service
        .update_channel(&forged, &bob)
        .unwrap_err()
        .is_permission_denied());
}

#[test]
fn test_deleted_channel_stays_deleted() {
    let dir = tempdir().unwrap();
    let config = file_config(dir.path().join("channels.sqlite3"));
    let alice = AccountId::new("alice");

    let channel_id = {
        let service = ChannelService::new(
            ChannelSqlStore::open(&config).unwrap(),
            StaticAccountDirectory::with_accounts(["alice", "bob"]),
        );
        let channel = service
            .create_channel(&alice, "testgroup", ChannelType::Chat)
            .unwrap();
        service
            .add_participant(&channel.id, &alice, &AccountId::new("bob"))
            .unwrap();
        service.delete_channel(&channel.id, &alice).unwrap();
        channel.id
    };

    let service = ChannelService::new(
        ChannelSqlStore::open(&config).unwrap(),
        StaticAccountDirectory::with_accounts(["alice"]),
    );
    assert!(service.get_channel(&channel_id).is_err());
    assert!(service.list_group_channels("testgroup").unwrap().is_empty());
}
