//! Channel service: authorization, validation and persistence of channel
//! operations.
//!
//! Every owner-gated operation loads the stored ownership record, asks the
//! policy, and only then touches the store. Mutations of one channel are
//! serialized through a per-channel lock.

use super::account::AccountDirectory;
use super::channel::{Channel, ChannelOwnership, ChannelType};
use super::errors::{ChannelError, ChannelResult};
use super::locks::ChannelLocks;
use super::manager::ChannelManager;
use super::participant::{Participant, ParticipantRole, RemovalAck};
use super::policy::{authorize, Decision, Operation};
use super::storage::ChannelStore;
use super::types::{AccountId, ChannelId};
use crate::config::ChannelConfig;
use crate::metrics::{record_denial, record_operation, OpResult};
use tracing::{debug, info, warn};

/// `ChannelManager` backed by a `ChannelStore` and an `AccountDirectory`
pub struct ChannelService<S, A> {
    store: S,
    accounts: A,
    limits: ChannelConfig,
    locks: ChannelLocks,
}

impl<S: ChannelStore, A: AccountDirectory> ChannelService<S, A> {
    /// Create a service with default input limits
    pub fn new(store: S, accounts: A) -> Self {
        Self::with_limits(store, accounts, ChannelConfig::default())
    }

    pub fn with_limits(store: S, accounts: A, limits: ChannelConfig) -> Self {
        Self {
            store,
            accounts,
            limits,
            locks: ChannelLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn limits(&self) -> &ChannelConfig {
        &self.limits
    }

    fn load_ownership(&self, channel_id: &ChannelId) -> ChannelResult<ChannelOwnership> {
        self.store
            .get_ownership(channel_id)?
            .ok_or(ChannelError::InvalidChannel(*channel_id))
    }

    fn ensure_account(&self, account_id: &AccountId) -> ChannelResult<()> {
        if self.accounts.account_exists(account_id)? {
            Ok(())
        } else {
            Err(ChannelError::InvalidAccount(account_id.clone()))
        }
    }

    /// Turn a policy decision into a result
    fn enforce(
        &self,
        operation: Operation,
        ownership: &ChannelOwnership,
        actor_id: &AccountId,
    ) -> ChannelResult<()> {
        match authorize(operation, ownership, actor_id) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                warn!(
                    channel_id = %ownership.channel_id(),
                    actor = %actor_id,
                    op = %operation,
                    %reason,
                    "Channel operation denied"
                );
                record_denial(operation);
                Err(ChannelError::PermissionDenied {
                    actor: actor_id.clone(),
                    operation,
                    channel: ownership.channel_id(),
                })
            }
        }
    }

    fn validate_group_name(&self, group_name: &str) -> ChannelResult<()> {
        if group_name.trim().is_empty() {
            return Err(ChannelError::Validation(
                "group name must not be empty".to_string(),
            ));
        }
        check_len("group name", group_name, self.limits.max_group_name_len)
    }

    fn validate_metadata(&self, channel: &Channel) -> ChannelResult<()> {
        check_len("name", &channel.name, self.limits.max_name_len)?;
        check_len("purpose", &channel.purpose, self.limits.max_purpose_len)
    }
}

fn check_len(field: &str, value: &str, max: usize) -> ChannelResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(ChannelError::Validation(format!(
            "{} is {} characters, limit is {}",
            field, len, max
        )));
    }
    Ok(())
}

/// Count the outcome of `operation` and pass the result through
fn observe<T>(operation: Operation, result: ChannelResult<T>) -> ChannelResult<T> {
    let outcome = match &result {
        Ok(_) => OpResult::Ok,
        Err(e) if e.is_permission_denied() => OpResult::Denied,
        Err(_) => OpResult::Error,
    };
    record_operation(operation, outcome);
    result
}

impl<S: ChannelStore, A: AccountDirectory> ChannelManager for ChannelService<S, A> {
    fn create_channel(
        &self,
        creator_id: &AccountId,
        group_name: &str,
        channel_type: ChannelType,
    ) -> ChannelResult<Channel> {
        let result = (|| -> ChannelResult<Channel> {
            self.ensure_account(creator_id)?;
            self.validate_group_name(group_name)?;

            let channel = Channel::new(creator_id.clone(), group_name.to_string(), channel_type);
            self.store.create_channel(&channel)?;

            info!(
                channel_id = %channel.id,
                creator = %creator_id,
                group = group_name,
                channel_type = %channel_type,
                "Created channel"
            );
            Ok(channel)
        })();
        observe(Operation::CreateChannel, result)
    }

    fn update_channel(&self, channel: &Channel, actor_id: &AccountId) -> ChannelResult<Channel> {
        let result = self.locks.with_lock(&channel.id, || -> ChannelResult<Channel> {
            let ownership = self.load_ownership(&channel.id)?;
            self.enforce(Operation::UpdateChannel, &ownership, actor_id)?;
            self.validate_metadata(channel)?;

            let mut stored = self
                .store
                .get_channel(&channel.id)?
                .ok_or(ChannelError::InvalidChannel(channel.id))?;
            stored.apply_metadata(channel);

            if !self.store.update_channel_metadata(&stored)? {
                return Err(ChannelError::InvalidChannel(channel.id));
            }

            info!(channel_id = %stored.id, actor = %actor_id, "Updated channel metadata");
            Ok(stored)
        });
        observe(Operation::UpdateChannel, result)
    }

    fn delete_channel(&self, channel_id: &ChannelId, actor_id: &AccountId) -> ChannelResult<()> {
        let result = self.locks.with_lock(channel_id, || -> ChannelResult<()> {
            let ownership = self.load_ownership(channel_id)?;
            self.enforce(Operation::DeleteChannel, &ownership, actor_id)?;

            if !self.store.delete_channel(channel_id)? {
                return Err(ChannelError::InvalidChannel(*channel_id));
            }

            info!(channel_id = %channel_id, actor = %actor_id, "Deleted channel");
            Ok(())
        });
        if result.is_ok() {
            self.locks.forget(channel_id);
        }
        observe(Operation::DeleteChannel, result)
    }

    fn add_participant(
        &self,
        channel_id: &ChannelId,
        actor_id: &AccountId,
        target: &AccountId,
    ) -> ChannelResult<Participant> {
        let result = self.locks.with_lock(channel_id, || -> ChannelResult<Participant> {
            let ownership = self.load_ownership(channel_id)?;
            self.enforce(Operation::AddParticipant, &ownership, actor_id)?;
            self.ensure_account(target)?;

            let participant = self
                .store
                .insert_participant(&Participant::new(*channel_id, target.clone()))?;

            info!(
                channel_id = %channel_id,
                actor = %actor_id,
                target = %target,
                "Added participant"
            );
            Ok(participant)
        });
        observe(Operation::AddParticipant, result)
    }

    fn remove_participant(
        &self,
        channel_id: &ChannelId,
        actor_id: &AccountId,
        target: &AccountId,
    ) -> ChannelResult<RemovalAck> {
        let result = self.locks.with_lock(channel_id, || -> ChannelResult<RemovalAck> {
            let ownership = self.load_ownership(channel_id)?;
            self.enforce(Operation::RemoveParticipant, &ownership, actor_id)?;

            let removed = self.store.delete_participant(channel_id, target)?;
            if removed {
                info!(
                    channel_id = %channel_id,
                    actor = %actor_id,
                    target = %target,
                    "Removed participant"
                );
            } else {
                debug!(
                    channel_id = %channel_id,
                    target = %target,
                    "Participant not present, nothing to remove"
                );
            }

            Ok(RemovalAck {
                channel_id: *channel_id,
                account_id: target.clone(),
                removed,
            })
        });
        observe(Operation::RemoveParticipant, result)
    }

    fn get_channel(&self, channel_id: &ChannelId) -> ChannelResult<Channel> {
        let result = self
            .store
            .get_channel(channel_id)
            .and_then(|found| found.ok_or(ChannelError::InvalidChannel(*channel_id)));
        observe(Operation::ViewChannel, result)
    }

    fn list_group_channels(&self, group_name: &str) -> ChannelResult<Vec<Channel>> {
        observe(
            Operation::ViewChannel,
            self.store.list_group_channels(group_name),
        )
    }

    fn list_participants(&self, channel_id: &ChannelId) -> ChannelResult<Vec<Participant>> {
        let result = self
            .load_ownership(channel_id)
            .and_then(|_| self.store.list_participants(channel_id));
        observe(Operation::ListParticipants, result)
    }

    fn is_participant(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<bool> {
        Ok(self.participant_role(channel_id, account_id)?.is_some())
    }

    fn participant_role(
        &self,
        channel_id: &ChannelId,
        account_id: &AccountId,
    ) -> ChannelResult<Option<ParticipantRole>> {
        let ownership = self.load_ownership(channel_id)?;
        if ownership.is_owner(account_id) {
            return Ok(Some(ParticipantRole::Owner));
        }

        Ok(self
            .store
            .get_participant(channel_id, account_id)?
            .map(|_| ParticipantRole::Member))
    }
}
