//! Channel data structures and the write-once ownership record

use super::types::{AccountId, ChannelId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Channel is a named communication scope owned by its creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique identifier
    pub id: ChannelId,

    /// Account that created the channel. Only the stored value is authoritative.
    pub creator_id: AccountId,

    /// Namespace the channel belongs to
    pub group_name: String,

    /// Kind of channel, fixed at creation
    pub channel_type: ChannelType,

    /// Human-readable name
    pub name: String,

    /// Free-form description
    pub purpose: String,

    /// Who may discover the channel
    pub privacy: ChannelPrivacy,

    /// When the channel was created
    pub created_at: Timestamp,

    /// Last time channel metadata was updated
    pub updated_at: Timestamp,
}

impl Channel {
    /// Create a new Channel with a fresh id and empty purpose
    pub fn new(creator_id: AccountId, group_name: String, channel_type: ChannelType) -> Self {
        let now = Timestamp::now();

        Channel {
            id: ChannelId::generate(),
            creator_id,
            group_name,
            channel_type,
            name: String::new(),
            purpose: String::new(),
            privacy: ChannelPrivacy::Public,
            created_at: now,
            updated_at: now,
        }
    }

    /// Ownership record captured from this channel
    pub fn ownership(&self) -> ChannelOwnership {
        ChannelOwnership::new(self.id, self.creator_id.clone(), self.created_at)
    }

    /// Copy the mutable metadata (name, purpose, privacy) from `update`.
    ///
    /// Identity, creator, group and type are left as stored.
    pub fn apply_metadata(&mut self, update: &Channel) {
        self.name = update.name.clone();
        self.purpose = update.purpose.clone();
        self.privacy = update.privacy;
        self.updated_at = Timestamp::now().max(self.updated_at);
    }

    /// Update channel purpose
    pub fn update_purpose(&mut self, purpose: impl Into<String>) {
        self.purpose = purpose.into();
        self.updated_at = Timestamp::now().max(self.updated_at);
    }

    /// Check whether `account_id` created this channel
    pub fn is_creator(&self, account_id: &AccountId) -> bool {
        &self.creator_id == account_id
    }
}

/// Write-once record binding a channel to the account that created it.
///
/// Stores never rewrite it, so authorization can read it without locking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelOwnership {
    channel_id: ChannelId,
    creator_id: AccountId,
    created_at: Timestamp,
}

impl ChannelOwnership {
    pub fn new(channel_id: ChannelId, creator_id: AccountId, created_at: Timestamp) -> Self {
        Self {
            channel_id,
            creator_id,
            created_at,
        }
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub fn creator_id(&self) -> &AccountId {
        &self.creator_id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_owner(&self, account_id: &AccountId) -> bool {
        &self.creator_id == account_id
    }
}

/// Channel kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Group,
    Topic,
    FollowingFeed,
    Followers,
    Chat,
    PinnedActivity,
    PrivateMessage,
}

impl ChannelType {
    pub const ALL: [ChannelType; 7] = [
        ChannelType::Group,
        ChannelType::Topic,
        ChannelType::FollowingFeed,
        ChannelType::Followers,
        ChannelType::Chat,
        ChannelType::PinnedActivity,
        ChannelType::PrivateMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Group => "group",
            ChannelType::Topic => "topic",
            ChannelType::FollowingFeed => "followingfeed",
            ChannelType::Followers => "followers",
            ChannelType::Chat => "chat",
            ChannelType::PinnedActivity => "pinnedactivity",
            ChannelType::PrivateMessage => "privatemessage",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ChannelType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParseEnumError::new("channel type", s))
    }
}

/// Channel privacy modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelPrivacy {
    Public,
    Private,
}

impl ChannelPrivacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelPrivacy::Public => "public",
            ChannelPrivacy::Private => "private",
        }
    }
}

impl fmt::Display for ChannelPrivacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelPrivacy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(ChannelPrivacy::Public),
            "private" => Ok(ChannelPrivacy::Private),
            _ => Err(ParseEnumError::new("channel privacy", s)),
        }
    }
}

/// Unrecognized textual form of a channel enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
