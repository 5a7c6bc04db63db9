//! Runtime statistics for the engine.

/// Counters for the current session. Not persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub ticks: u64,
    pub orders_submitted: u64,
    pub orders_cancelled: u64,
    pub deposits: u64,
    pub withdrawals: u64,
}
