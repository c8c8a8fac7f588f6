//! Account directory seam.
//!
//! Accounts live in another service; the channel core only asks whether an
//! identifier resolves.

use super::errors::ChannelResult;
use super::types::AccountId;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Resolves account identifiers supplied by callers
pub trait AccountDirectory: Send + Sync {
    /// Whether `account_id` refers to an existing account
    fn account_exists(&self, account_id: &AccountId) -> ChannelResult<bool>;
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for Arc<T> {
    fn account_exists(&self, account_id: &AccountId) -> ChannelResult<bool> {
        (**self).account_exists(account_id)
    }
}

/// Fixed in-memory account set, for tests and the command line
#[derive(Debug, Default)]
pub struct StaticAccountDirectory {
    accounts: RwLock<HashSet<AccountId>>,
}

impl StaticAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts<I>(accounts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AccountId>,
    {
        Self {
            accounts: RwLock::new(accounts.into_iter().map(Into::into).collect()),
        }
    }

    /// Register an account; returns false if it was already known
    pub fn register(&self, account_id: AccountId) -> bool {
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(account_id)
    }

    pub fn unregister(&self, account_id: &AccountId) -> bool {
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(account_id)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountDirectory for StaticAccountDirectory {
    fn account_exists(&self, account_id: &AccountId) -> ChannelResult<bool> {
        Ok(self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(account_id))
    }
}
