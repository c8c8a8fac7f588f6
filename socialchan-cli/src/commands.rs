//! Subcommand execution against a channel manager

use crate::Command;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use socialchan_core::core_channel::{AccountId, ChannelManager};

fn require_actor(actor: Option<&AccountId>) -> Result<&AccountId> {
    actor.context("this command needs the acting account, pass --as <ACCOUNT>")
}

/// Run `command` and return its JSON output
pub(crate) fn run(
    manager: &impl ChannelManager,
    actor: Option<&AccountId>,
    command: Command,
) -> Result<Value> {
    let output = match command {
        Command::Create {
            group,
            channel_type,
        } => {
            let channel = manager.create_channel(require_actor(actor)?, &group, channel_type)?;
            serde_json::to_value(channel)?
        }
        Command::Update {
            channel,
            name,
            purpose,
            privacy,
        } => {
            let mut edit = manager.get_channel(&channel)?;
            if let Some(name) = name {
                edit.name = name;
            }
            if let Some(purpose) = purpose {
                edit.purpose = purpose;
            }
            if let Some(privacy) = privacy {
                edit.privacy = privacy;
            }
            serde_json::to_value(manager.update_channel(&edit, require_actor(actor)?)?)?
        }
        Command::Add { channel, account } => {
            let participant =
                manager.add_participant(&channel, require_actor(actor)?, &AccountId::new(account))?;
            serde_json::to_value(participant)?
        }
        Command::Remove { channel, account } => {
            let ack = manager.remove_participant(
                &channel,
                require_actor(actor)?,
                &AccountId::new(account),
            )?;
            serde_json::to_value(ack)?
        }
        Command::Show { channel } => serde_json::to_value(manager.get_channel(&channel)?)?,
        Command::Members { channel } => {
            let owner = manager.get_channel(&channel)?.creator_id;
            let participants = manager.list_participants(&channel)?;
            json!({
                "channel_id": channel,
                "owner": owner,
                "participants": participants,
            })
        }
        Command::List { group } => serde_json::to_value(manager.list_group_channels(&group)?)?,
        Command::Delete { channel } => {
            manager.delete_channel(&channel, require_actor(actor)?)?;
            json!({ "channel_id": channel, "deleted": true })
        }
    };

    Ok(output)
}
