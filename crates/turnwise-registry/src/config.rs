//! Registry configuration.

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Liveness tuning for the registry and its reaper.
///
/// The defaults match the polling contract clients are written against:
/// a client that polls at least every 20 seconds is never considered
/// gone, and abandonment is noticed within about a second of the last
/// participant going stale.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How long (in seconds) a participant can go without a successful
    /// move or poll before the reaper marks them disconnected.
    ///
    /// Default: 20 seconds.
    pub stale_after_secs: u64,

    /// Seconds between reaper sweeps.
    ///
    /// Default: 1 second.
    pub sweep_interval_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: 20,
            sweep_interval_secs: 1,
        }
    }
}
