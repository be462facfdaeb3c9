//! detector — provenance metadata for measured series.
pub mod channel;

pub use channel::Channel;
