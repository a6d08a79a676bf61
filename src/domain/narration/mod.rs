pub mod service;
pub mod spool;

pub use service::{BatchSummary, NarrationService};
pub use spool::AudioSpool;
