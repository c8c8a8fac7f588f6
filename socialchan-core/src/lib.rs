//! socialchan core library
//!
//! Channels scoped to groups, owned by their creator, with owner-managed
//! participant lists.

pub mod config;
pub mod core_channel;
pub mod logging;
pub mod metrics;

pub use config::Config;
pub use core_channel::{ChannelError, ChannelManager, ChannelService};
pub use logging::{init_logging, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        assert!(Config::default().validate().is_ok());
    }
}
