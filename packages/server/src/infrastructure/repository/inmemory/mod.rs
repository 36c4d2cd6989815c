//! インメモリ実装

mod signaling;

pub use signaling::InMemorySignalingRepository;
