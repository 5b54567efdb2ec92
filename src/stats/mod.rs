//! Persistent win/loss/draw counters, keyed by opponent variant plus one
//! aggregate key.

mod store;
mod tally;

pub use store::{record_outcome, JsonFileTallyStore, MemoryTallyStore, TallyStore};
pub use tally::{variant_key, Tally, TOTAL_KEY};
