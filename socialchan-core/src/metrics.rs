//! Channel operation counters
//!
//! Counters go through the `metrics` facade; without an installed recorder
//! they are no-ops.

use crate::core_channel::Operation;
use metrics::{counter, describe_counter};

pub const CHANNEL_OPS_TOTAL: &str = "socialchan_channel_ops_total";
pub const AUTHZ_DENIED_TOTAL: &str = "socialchan_authz_denied_total";

/// Register counter descriptions with the installed recorder
pub fn init_metrics() {
    describe_counter!(
        CHANNEL_OPS_TOTAL,
        "Channel operations by operation and outcome"
    );
    describe_counter!(
        AUTHZ_DENIED_TOTAL,
        "Channel operations rejected by the ownership check"
    );
}

/// Outcome label for `socialchan_channel_ops_total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpResult {
    Ok,
    Denied,
    Error,
}

impl OpResult {
    fn as_str(self) -> &'static str {
        match self {
            OpResult::Ok => "ok",
            OpResult::Denied => "denied",
            OpResult::Error => "error",
        }
    }
}

pub(crate) fn record_operation(operation: Operation, result: OpResult) {
    counter!(
        CHANNEL_OPS_TOTAL,
        "op" => operation.as_str(),
        "result" => result.as_str()
    )
    .increment(1);
}

pub(crate) fn record_denial(operation: Operation) {
    counter!(AUTHZ_DENIED_TOTAL, "op" => operation.as_str()).increment(1);
}
