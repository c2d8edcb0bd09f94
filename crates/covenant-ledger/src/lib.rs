//! # Covenant Ledger
//!
//! Ports to the external collaborators the lending core runs against,
//! plus in-memory implementations for tests and embedding:
//!
//! - [`TransactionClock`]: the committing transaction's timestamp and
//!   unique sequence id
//! - [`TokenLedger`]: balance debit/credit and named collateral holds
//! - [`EntityStore`]: keyed records with prefix range scans
//!
//! Every port call is synchronous; atomic all-or-nothing application of
//! an operation's write set is the hosting ledger's responsibility.

pub mod clock;
pub mod store;
pub mod tokens;

pub use clock::{FixedClock, SystemClock, TransactionClock};
pub use store::{EntityStore, InMemoryStore};
pub use tokens::{InMemoryTokenLedger, TokenLedger};
