//! Channel core: ownership, membership and mutation authorization
//!
//! A channel is owned by the account that created it. Only that account may
//! update the channel's metadata, delete it, or add and remove participants.
//! The owner is read from a write-once record captured at creation, so a
//! caller cannot claim ownership by editing the channel value it submits.
//!
//! # Example
//! ```
//! use socialchan_core::core_channel::{
//!     AccountId, ChannelManager, ChannelService, ChannelType, MemoryChannelStore,
//!     StaticAccountDirectory,
//! };
//!
//! let service = ChannelService::new(
//!     MemoryChannelStore::new(),
//!     StaticAccountDirectory::with_accounts(["alice", "bob"]),
//! );
//! let alice = AccountId::new("alice");
//! let bob = AccountId::new("bob");
//!
//! let channel = service.create_channel(&alice, "testgroup", ChannelType::Chat).unwrap();
//! service.add_participant(&channel.id, &alice, &bob).unwrap();
//! assert!(service.add_participant(&channel.id, &bob, &bob).is_err());
//! ```

pub mod account;
pub mod channel;
pub mod errors;
mod locks;
pub mod manager;
pub mod participant;
pub mod policy;
pub mod service;
pub mod storage;
pub mod types;

pub use account::{AccountDirectory, StaticAccountDirectory};
pub use channel::{Channel, ChannelOwnership, ChannelPrivacy, ChannelType, ParseEnumError};
pub use errors::{ChannelError, ChannelResult};
pub use manager::ChannelManager;
pub use participant::{Participant, ParticipantRole, ParticipantSet, RemovalAck};
pub use policy::{authorize, Decision, DenyReason, Operation};
pub use service::ChannelService;
pub use storage::{ChannelSqlStore, ChannelStore, MemoryChannelStore};
pub use types::{AccountId, ChannelId, Timestamp};
