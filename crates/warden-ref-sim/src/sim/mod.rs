//! Simulated collaborators.
//!
//! Stand-ins for the ledger, the swap aggregator and the model service. They
//! hold all state in memory and never touch the network.

pub mod inference;
pub mod ledger;
pub mod swap;

pub use inference::ScriptedInference;
pub use ledger::{SimLedger, Submission};
pub use swap::{Rate, SimSwapAggregator};
