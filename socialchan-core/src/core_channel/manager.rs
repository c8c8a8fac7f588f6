//! Manager trait for channel operations

use super::channel::{Channel, ChannelType};
use super::errors::ChannelResult;
use super::participant::{Participant, ParticipantRole, RemovalAck};
use super::types::{AccountId, ChannelId};

/// Channel lifecycle and membership operations.
///
/// Mutations other than creation are owner-gated: the actor must be the
/// account recorded as creator when the channel was created.
pub trait ChannelManager: Send + Sync {
    /// Create a channel owned by `creator_id`
    fn create_channel(
        &self,
        creator_id: &AccountId,
        group_name: &str,
        channel_type: ChannelType,
    ) -> ChannelResult<Channel>;

    /// Persist the mutable metadata of `channel` (name, purpose, privacy).
    ///
    /// Identity and ownership fields of the submitted value are ignored.
    fn update_channel(&self, channel: &Channel, actor_id: &AccountId) -> ChannelResult<Channel>;

    /// Delete a channel and all of its participants
    fn delete_channel(&self, channel_id: &ChannelId, actor_id: &AccountId) -> ChannelResult<()>;

    /// Add `target` to the channel; returns the existing record if already present
    fn add_participant(
        &self,
        channel_id: &ChannelId,
        actor_id: &AccountId,
        target: &AccountId,
    ) -> ChannelResult<Participant>;

    /// Remove `target` from the channel
    fn remove_participant(
        &self,
        channel_id: &ChannelId,
        actor_id: &AccountId,
        target: &AccountId,
    ) -> ChannelResult<RemovalAck>;

    fn get_channel(&self, channel_id: &ChannelId) -> ChannelResult<Channel>;

    /// Channels of a group, oldest first
    fn list_group_channels(&self, group_name: &str) -> ChannelResult<Vec<Channel>>;

    /// Explicit participant records of a channel
    fn list_participants(&self, channel_id: &ChannelId) -> ChannelResult<Vec<Participant>>;

    /// Whether `account_id` is the owner or has a participant record
    fn is_participant(&self, channel_id: &ChannelId, account_id: &AccountId)
        -> ChannelResult<bool>;

    /// Role of `account_id`, or `None` when it is not part of the channel
    fn participant_role(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<Option<ParticipantRole>>;
}
