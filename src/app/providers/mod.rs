pub mod simulated;

pub use simulated::{default_seed, SimulatedProvider};
