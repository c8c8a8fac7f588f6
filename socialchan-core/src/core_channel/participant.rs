//! Participant records and the per-channel participant set

use super::channel::ChannelOwnership;
use super::types::{AccountId, ChannelId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{BTreeMap, Entry};

/// Membership of one account in one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub channel_id: ChannelId,
    pub account_id: AccountId,
    pub added_at: Timestamp,
}

impl Participant {
    pub fn new(channel_id: ChannelId, account_id: AccountId) -> Self {
        Self {
            channel_id,
            account_id,
            added_at: Timestamp::now(),
        }
    }
}

/// Role of an account within a channel, derived from the ownership record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// Created the channel; may update it and manage participants
    Owner,
    /// Plain member
    Member,
}

impl ParticipantRole {
    pub fn for_account(ownership: &ChannelOwnership, account_id: &AccountId) -> Self {
        if ownership.is_owner(account_id) {
            ParticipantRole::Owner
        } else {
            ParticipantRole::Member
        }
    }
}

/// Acknowledgement of a participant removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalAck {
    pub channel_id: ChannelId,
    pub account_id: AccountId,
    /// False when the account was not a participant to begin with
    pub removed: bool,
}

/// Participants of a single channel, keyed by account.
///
/// Keyed storage makes insert and remove idempotent.
#[derive(Debug, Clone, Default)]
pub struct ParticipantSet {
    records: BTreeMap<AccountId, Participant>,
}

impl ParticipantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless one exists for the account.
    ///
    /// Returns the stored record and whether it was newly inserted.
    pub fn insert(&mut self, participant: Participant) -> (Participant, bool) {
        match self.records.entry(participant.account_id.clone()) {
            Entry::Occupied(existing) => (existing.get().clone(), false),
            Entry::Vacant(slot) => (slot.insert(participant).clone(), true),
        }
    }

    pub fn remove(&mut self, account_id: &AccountId) -> Option<Participant> {
        self.records.remove(account_id)
    }

    pub fn get(&self, account_id: &AccountId) -> Option<&Participant> {
        self.records.get(account_id)
    }

    pub fn contains(&self, account_id: &AccountId) -> bool {
        self.records.contains_key(account_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in account order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.records.values()
    }
}
