use super::{Command, Output, apply};
use crate::error::EngineResult;
use crate::store::Store;
use tracing::debug;

/// What a batch does when one of its commands fails.
///
/// Per-command errors never roll back effects already applied; the policy
/// only decides whether the remainder of the batch still runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Record the error and keep going.
    #[default]
    ContinueOnError,
    /// Skip everything after the first error.
    StopOnError,
}

/// Replay `commands` in submission order against an already-locked store.
///
/// The caller holds the store's write guard for the whole call, which is
/// what makes the batch atomic with respect to other batches and commands:
/// nobody can observe the keyspace between two of its steps.
pub fn run(
    store: &mut Store,
    now: u64,
    commands: &[Command],
    policy: BatchPolicy,
) -> Vec<EngineResult<Output>> {
    let mut results = Vec::with_capacity(commands.len());
    for (index, cmd) in commands.iter().enumerate() {
        let result = apply(store, now, cmd);
        let failed = result.is_err();
        if failed {
            debug!(index, policy = ?policy, "batch command failed");
        }
        results.push(result);
        if failed && policy == BatchPolicy::StopOnError {
            break;
        }
    }
    results
}
