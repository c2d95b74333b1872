use crate::command::batch::BatchPolicy;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Background expiry sweep frequency (cycles per second).
    pub hz: u64,
    /// How many expired keys one sweep cycle may reclaim.
    pub active_expire_sample: usize,
    /// Whether the background sweeper reclaims expired keys at all.
    /// Lazy expiry on read happens regardless.
    pub active_expire_enabled: bool,
    /// What a batch does when one of its commands fails.
    pub batch_policy: BatchPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hz: 10,
            active_expire_sample: 20,
            active_expire_enabled: true,
            batch_policy: BatchPolicy::ContinueOnError,
        }
    }
}
