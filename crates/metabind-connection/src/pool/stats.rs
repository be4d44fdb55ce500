//! Pool statistics types

use serde::{Deserialize, Serialize};

/// Snapshot of a connection pool's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Connections resting in the pool
    idle: usize,
    /// Connections borrowed, being validated, or being opened
    active: usize,
    /// Callers blocked in `get`
    waiting: usize,
    /// Configured upper bound on `idle + active`
    max_size: usize,
}

impl PoolStats {
    pub fn new(idle: usize, active: usize, waiting: usize, max_size: usize) -> Self {
        Self {
            idle,
            active,
            waiting,
            max_size,
        }
    }

    /// Live connections, idle and active
    pub fn total(&self) -> usize {
        self.idle + self.active
    }

    pub fn idle(&self) -> usize {
        self.idle
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn waiting(&self) -> usize {
        self.waiting
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Share of the pool's capacity currently borrowed, from 0.0 to 1.0
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.active as f64 / self.max_size as f64
        }
    }

    /// True when the next `get` would have to wait
    pub fn is_exhausted(&self) -> bool {
        self.idle == 0 && self.active >= self.max_size
    }
}
