//! Transaction clock port
//!
//! The core never reads wall-clock time directly: every accrual inside
//! one operation must see the identical `now`, and replicas must agree
//! on it. The hosting ledger supplies the committing transaction's
//! timestamp and a unique, time-ordered sequence id through this port.

use parking_lot::Mutex;
use uuid::Uuid;

pub trait TransactionClock: Send + Sync {
    /// The current transaction's timestamp (Unix seconds).
    fn now(&self) -> i64;

    /// A unique, time-ordered sequence id for entity keys.
    fn tx_seq(&self) -> String;
}

/// Wall-clock implementation for embedding outside a replicated host.
#[derive(Debug, Default)]
pub struct SystemClock;

impl TransactionClock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn tx_seq(&self) -> String {
        Uuid::now_v7().simple().to_string()
    }
}

/// Manually-advanced clock for deterministic tests.
pub struct FixedClock {
    state: Mutex<FixedState>,
}

struct FixedState {
    now: i64,
    next_seq: u64,
}

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self {
            state: Mutex::new(FixedState { now, next_seq: 0 }),
        }
    }

    /// Move the clock forward (or backward, for out-of-order tests).
    pub fn advance(&self, seconds: i64) {
        self.state.lock().now += seconds;
    }

    pub fn set(&self, now: i64) {
        self.state.lock().now = now;
    }
}

impl TransactionClock for FixedClock {
    fn now(&self) -> i64 {
        self.state.lock().now
    }

    fn tx_seq(&self) -> String {
        let mut state = self.state.lock();
        state.next_seq += 1;
        format!("{:08x}", state.next_seq)
    }
}
