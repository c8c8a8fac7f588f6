//! Integration tests for the socialchan CLI
//!
//! Each test drives the real binary against a temporary SQLite database with
//! several acting accounts.

use anyhow::{bail, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const ACCOUNTS: &str = "alice,bob,carol";

/// A database shared by every actor in one test
struct Workspace {
    #[allow(dead_code)]
    dir: TempDir,
    database: PathBuf,
}

impl Workspace {
    fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let database = dir.path().join("channels.sqlite3");
        Ok(Self { dir, database })
    }

    fn invoke(&self, actor: Option<&str>, args: &[&str]) -> Result<Output> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_socialchan"));
        command
            .env_remove("RUST_LOG")
            .env_remove("SOCIALCHAN_ACCOUNTS")
            .arg("--database")
            .arg(&self.database)
            .arg("--accounts")
            .arg(ACCOUNTS)
            .arg("--log-level")
            .arg("error");
        if let Some(actor) = actor {
            command.arg("--as").arg(actor);
        }
        Ok(command.args(args).output()?)
    }

    /// Run a command that must succeed and parse its JSON output
    fn ok(&self, actor: Option<&str>, args: &[&str]) -> Result<Value> {
        let output = self.invoke(actor, args)?;
        if !output.status.success() {
            bail!(
                "{:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// Run a command that must fail and return its stderr
    fn fails(&self, actor: Option<&str>, args: &[&str]) -> Result<String> {
        let output = self.invoke(actor, args)?;
        if output.status.success() {
            bail!("{:?} unexpectedly succeeded", args);
        }
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }

    fn create_channel(&self, owner: &str, group: &str) -> Result<String> {
        let channel = self.ok(Some(owner), &["create", group, "--type", "chat"])?;
        match channel["id"].as_str() {
            Some(id) => Ok(id.to_string()),
            None => bail!("no channel id in {}", channel),
        }
    }
}

#[test]
fn test_owner_manages_channel() -> Result<()> {
    let ws = Workspace::new()?;
    let channel = ws.create_channel("alice", "testgroup")?;

    let updated = ws.ok(
        Some("alice"),
        &["update", &channel, "--purpose", "another purpose from the paradise"],
    )?;
    assert_eq!(updated["purpose"], "another purpose from the paradise");
    assert_eq!(updated["creator_id"], "alice");

    let participant = ws.ok(Some("alice"), &["add", &channel, "bob"])?;
    assert_eq!(participant["account_id"], "bob");

    let members = ws.ok(None, &["members", &channel])?;
    assert_eq!(members["owner"], "alice");
    assert_eq!(members["participants"].as_array().map(Vec::len), Some(1));

    let ack = ws.ok(Some("alice"), &["remove", &channel, "bob"])?;
    assert_eq!(ack["removed"], true);

    Ok(())
}

#[test]
fn test_non_owner_is_rejected() -> Result<()> {
    let ws = Workspace::new()?;
    let channel = ws.create_channel("alice", "testgroup")?;

    let stderr = ws.fails(Some("bob"), &["update", &channel, "--purpose", "mine now"])?;
    assert!(stderr.contains("Permission denied"), "stderr: {}", stderr);

    ws.fails(Some("bob"), &["add", &channel, "bob"])?;
    ws.fails(Some("bob"), &["delete", &channel])?;

    let shown = ws.ok(None, &["show", &channel])?;
    assert_eq!(shown["purpose"], "");
    let members = ws.ok(None, &["members", &channel])?;
    assert_eq!(members["participants"].as_array().map(Vec::len), Some(0));

    Ok(())
}

#[test]
fn test_unknown_accounts_and_missing_actor() -> Result<()> {
    let ws = Workspace::new()?;

    let stderr = ws.fails(Some("mallory"), &["create", "testgroup"])?;
    assert!(stderr.contains("Invalid account"), "stderr: {}", stderr);

    let channel = ws.create_channel("alice", "testgroup")?;
    let stderr = ws.fails(Some("alice"), &["add", &channel, "mallory"])?;
    assert!(stderr.contains("Invalid account"), "stderr: {}", stderr);

    let stderr = ws.fails(None, &["add", &channel, "bob"])?;
    assert!(stderr.contains("--as"), "stderr: {}", stderr);

    Ok(())
}

#[test]
fn test_list_and_delete() -> Result<()> {
    let ws = Workspace::new()?;
    let first = ws.create_channel("alice", "testgroup")?;
    ws.create_channel("carol", "testgroup")?;
    ws.create_channel("bob", "othergroup")?;

    let listed = ws.ok(None, &["list", "testgroup"])?;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));

    let deleted = ws.ok(Some("alice"), &["delete", &first])?;
    assert_eq!(deleted["deleted"], true);

    let listed = ws.ok(None, &["list", "testgroup"])?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    ws.fails(None, &["show", &first])?;

    Ok(())
}
