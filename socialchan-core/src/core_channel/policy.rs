//! Authorization policy for channel operations.
//!
//! `authorize` is a pure function of its inputs: it reads only the write-once
//! ownership record and the acting account, never any caller-supplied copy of
//! the channel. Owner-gated operations are allowed for the creator alone;
//! creation and reads are open to any valid account.

use super::channel::ChannelOwnership;
use super::types::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations the policy knows how to decide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateChannel,
    ViewChannel,
    UpdateChannel,
    DeleteChannel,
    AddParticipant,
    RemoveParticipant,
    ListParticipants,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::CreateChannel,
        Operation::ViewChannel,
        Operation::UpdateChannel,
        Operation::DeleteChannel,
        Operation::AddParticipant,
        Operation::RemoveParticipant,
        Operation::ListParticipants,
    ];

    /// Whether only the channel owner may perform this operation
    pub fn is_owner_gated(&self) -> bool {
        match self {
            Operation::UpdateChannel
            | Operation::DeleteChannel
            | Operation::AddParticipant
            | Operation::RemoveParticipant => true,
            Operation::CreateChannel | Operation::ViewChannel | Operation::ListParticipants => {
                false
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateChannel => "create_channel",
            Operation::ViewChannel => "view_channel",
            Operation::UpdateChannel => "update_channel",
            Operation::DeleteChannel => "delete_channel",
            Operation::AddParticipant => "add_participant",
            Operation::RemoveParticipant => "remove_participant",
            Operation::ListParticipants => "list_participants",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenyReason {
    /// The actor did not create the channel
    NotOwner,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NotOwner => f.write_str("actor is not the channel owner"),
        }
    }
}

/// Outcome of a policy check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `actor` may perform `operation` on the channel described by
/// `ownership`.
pub fn authorize(
    operation: Operation,
    ownership: &ChannelOwnership,
    actor: &AccountId,
) -> Decision {
    if !operation.is_owner_gated() || ownership.is_owner(actor) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::NotOwner)
    }
}
