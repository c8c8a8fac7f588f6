//! Storage layer for Channels and their participants
//!
//! `ChannelStore` is the persistence seam used by the channel service. Two
//! backends are provided: an in-memory store and a SQLite store.

pub mod memory_store;
pub mod migrations;
pub mod sql_store;

pub use memory_store::MemoryChannelStore;
pub use migrations::{migrate, CURRENT_CHANNEL_SCHEMA_VERSION};
pub use sql_store::ChannelSqlStore;

use super::channel::{Channel, ChannelOwnership};
use super::errors::ChannelResult;
use super::participant::Participant;
use super::types::{AccountId, ChannelId};
use std::sync::Arc;

/// Persistence for channel records, ownership records and participants.
///
/// Implementations must never rewrite an ownership record once created, and
/// must give read-your-writes consistency for a single channel.
pub trait ChannelStore: Send + Sync {
    /// Insert a channel together with its ownership record
    fn create_channel(&self, channel: &Channel) -> ChannelResult<()>;

    fn get_channel(&self, channel_id: &ChannelId) -> ChannelResult<Option<Channel>>;

    fn get_ownership(&self, channel_id: &ChannelId) -> ChannelResult<Option<ChannelOwnership>>;

    /// Persist name, purpose, privacy and updated_at of an existing channel.
    ///
    /// Returns false when no such channel exists.
    fn update_channel_metadata(&self, channel: &Channel) -> ChannelResult<bool>;

    /// Delete a channel, its ownership record and its participants
    fn delete_channel(&self, channel_id: &ChannelId) -> ChannelResult<bool>;

    /// Channels in a group, oldest first
    fn list_group_channels(&self, group_name: &str) -> ChannelResult<Vec<Channel>>;

    /// Insert a participant unless already present; returns the stored record
    fn insert_participant(&self, participant: &Participant) -> ChannelResult<Participant>;

    fn get_participant(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<Option<Participant>>;

    /// Returns whether a record was deleted
    fn delete_participant(&self, channel_id: &ChannelId, account_id: &AccountId)
        -> ChannelResult<bool>;

    /// Participants of a channel, in account order
    fn list_participants(&self, channel_id: &ChannelId) -> ChannelResult<Vec<Participant>>;
}

impl<T: ChannelStore + ?Sized> ChannelStore for Arc<T> {
    fn create_channel(&self, channel: &Channel) -> ChannelResult<()> {
        (**self).create_channel(channel)
    }

    fn get_channel(&self, channel_id: &ChannelId) -> ChannelResult<Option<Channel>> {
        (**self).get_channel(channel_id)
    }

    fn get_ownership(&self, channel_id: &ChannelId) -> ChannelResult<Option<ChannelOwnership>> {
        (**self).get_ownership(channel_id)
    }

    fn update_channel_metadata(&self, channel: &Channel) -> ChannelResult<bool> {
        (**self).update_channel_metadata(channel)
    }

    fn delete_channel(&self, channel_id: &ChannelId) -> ChannelResult<bool> {
        (**self).delete_channel(channel_id)
    }

    fn list_group_channels(&self, group_name: &str) -> ChannelResult<Vec<Channel>> {
        (**self).list_group_channels(group_name)
    }

    fn insert_participant(&self, participant: &Participant) -> ChannelResult<Participant> {
        (**self).insert_participant(participant)
    }

    fn get_participant(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<Option<Participant>> {
        (**self).get_participant(channel_id, account_id)
    }

    fn delete_participant(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<bool> {
        (**self).delete_participant(channel_id, account_id)
    }

    fn list_participants(&self, channel_id: &ChannelId) -> ChannelResult<Vec<Participant>> {
        (**self).list_participants(channel_id)
    }
}
