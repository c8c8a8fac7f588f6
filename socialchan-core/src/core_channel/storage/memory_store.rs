//! In-memory channel store

use super::ChannelStore;
use crate::core_channel::channel::{Channel, ChannelOwnership};
use crate::core_channel::errors::{ChannelError, ChannelResult};
use crate::core_channel::participant::{Participant, ParticipantSet};
use crate::core_channel::types::{AccountId, ChannelId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct Tables {
    channels: HashMap<ChannelId, Channel>,
    owners: HashMap<ChannelId, ChannelOwnership>,
    participants: HashMap<ChannelId, ParticipantSet>,
}

/// In-memory storage for channels (tests, ephemeral deployments)
#[derive(Debug, Default)]
pub struct MemoryChannelStore {
    tables: RwLock<Tables>,
}

impl MemoryChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChannelStore for MemoryChannelStore {
    fn create_channel(&self, channel: &Channel) -> ChannelResult<()> {
        let mut tables = self.write();
        if tables.channels.contains_key(&channel.id) {
            return Err(ChannelError::Storage(format!(
                "channel {} already exists",
                channel.id
            )));
        }

        tables.owners.insert(channel.id, channel.ownership());
        tables.channels.insert(channel.id, channel.clone());
        Ok(())
    }

    fn get_channel(&self, channel_id: &ChannelId) -> ChannelResult<Option<Channel>> {
        Ok(self.read().channels.get(channel_id).cloned())
    }

    fn get_ownership(&self, channel_id: &ChannelId) -> ChannelResult<Option<ChannelOwnership>> {
        Ok(self.read().owners.get(channel_id).cloned())
    }

    fn update_channel_metadata(&self, channel: &Channel) -> ChannelResult<bool> {
        let mut tables = self.write();
        let Some(stored) = tables.channels.get_mut(&channel.id) else {
            return Ok(false);
        };

        stored.name = channel.name.clone();
        stored.purpose = channel.purpose.clone();
        stored.privacy = channel.privacy;
        stored.updated_at = channel.updated_at;
        Ok(true)
    }

    fn delete_channel(&self, channel_id: &ChannelId) -> ChannelResult<bool> {
        let mut tables = self.write();
        tables.participants.remove(channel_id);
        tables.owners.remove(channel_id);
        Ok(tables.channels.remove(channel_id).is_some())
    }

    fn list_group_channels(&self, group_name: &str) -> ChannelResult<Vec<Channel>> {
        let tables = self.read();
        let mut channels: Vec<Channel> = tables
            .channels
            .values()
            .filter(|c| c.group_name == group_name)
            .cloned()
            .collect();
        channels.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(channels)
    }

    fn insert_participant(&self, participant: &Participant) -> ChannelResult<Participant> {
        let mut tables = self.write();
        if !tables.channels.contains_key(&participant.channel_id) {
            return Err(ChannelError::InvalidChannel(participant.channel_id));
        }

        let (stored, _) = tables
            .participants
            .entry(participant.channel_id)
            .or_default()
            .insert(participant.clone());
        Ok(stored)
    }

    fn get_participant(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<Option<Participant>> {
        Ok(self
            .read()
            .participants
            .get(channel_id)
            .and_then(|set| set.get(account_id))
            .cloned())
    }

    fn delete_participant(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<bool> {
        let mut tables = self.write();
        Ok(tables
            .participants
            .get_mut(channel_id)
            .and_then(|set| set.remove(account_id))
            .is_some())
    }

    fn list_participants(&self, channel_id: &ChannelId) -> ChannelResult<Vec<Participant>> {
        Ok(self
            .read()
            .participants
            .get(channel_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_channel::channel::ChannelType;

    fn stored_channel(store: &MemoryChannelStore, group: &str) -> Channel {
        let channel = Channel::new(AccountId::new("alice"), group.to_string(), ChannelType::Chat);
        store.create_channel(&channel).unwrap();
        channel
    }

    #[test]
    fn test_create_and_get_channel() {
        let store = MemoryChannelStore::new();
        let channel = stored_channel(&store, "testgroup");

        assert_eq!(store.get_channel(&channel.id).unwrap(), Some(channel.clone()));
        assert_eq!(
            store.get_ownership(&channel.id).unwrap().unwrap().creator_id(),
            &AccountId::new("alice")
        );
        assert!(store.create_channel(&channel).is_err(), "duplicate id");
    }

    #[test]
    fn test_metadata_update_keeps_creator() {
        let store = MemoryChannelStore::new();
        let channel = stored_channel(&store, "testgroup");

        let mut forged = channel.clone();
        forged.creator_id = AccountId::new("mallory");
        forged.purpose = "new purpose".to_string();
        assert!(store.update_channel_metadata(&forged).unwrap());

        let stored = store.get_channel(&channel.id).unwrap().unwrap();
        assert_eq!(stored.purpose, "new purpose");
        assert_eq!(stored.creator_id, AccountId::new("alice"));
    }

    #[test]
    fn test_update_missing_channel_reports_false() {
        let store = MemoryChannelStore::new();
        let channel = Channel::new(AccountId::new("alice"), "g".to_string(), ChannelType::Topic);
        assert!(!store.update_channel_metadata(&channel).unwrap());
    }

    #[test]
    fn test_participants_are_keyed() {
        let store = MemoryChannelStore::new();
        let channel = stored_channel(&store, "testgroup");
        let bob = AccountId::new("bob");

        let first = store
            .insert_participant(&Participant::new(channel.id, bob.clone()))
            .unwrap();
        let second = store
            .insert_participant(&Participant::new(channel.id, bob.clone()))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list_participants(&channel.id).unwrap().len(), 1);

        assert!(store.delete_participant(&channel.id, &bob).unwrap());
        assert!(!store.delete_participant(&channel.id, &bob).unwrap());
        assert!(store.get_participant(&channel.id, &bob).unwrap().is_none());
    }

    #[test]
    fn test_participant_requires_channel() {
        let store = MemoryChannelStore::new();
        let result = store.insert_participant(&Participant::new(
            ChannelId::generate(),
            AccountId::new("bob"),
        ));
        assert!(matches!(result, Err(ChannelError::InvalidChannel(_))));
    }

    #[test]
    fn test_delete_channel_drops_everything() {
        let store = MemoryChannelStore::new();
        let channel = stored_channel(&store, "testgroup");
        store
            .insert_participant(&Participant::new(channel.id, AccountId::new("bob")))
            .unwrap();

        assert!(store.delete_channel(&channel.id).unwrap());
        assert!(store.get_channel(&channel.id).unwrap().is_none());
        assert!(store.get_ownership(&channel.id).unwrap().is_none());
        assert!(store.list_participants(&channel.id).unwrap().is_empty());
        assert!(!store.delete_channel(&channel.id).unwrap());
    }

    #[test]
    fn test_list_group_channels_filters_by_group() {
        let store = MemoryChannelStore::new();
        let a = stored_channel(&store, "testgroup");
        let b = stored_channel(&store, "testgroup");
        stored_channel(&store, "othergroup");

        let listed = store.list_group_channels("testgroup").unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|c| c.id == a.id));
        assert!(listed.iter().any(|c| c.id == b.id));
    }
}
