pub mod latency;

pub use latency::{SimulatedLatency, sleep_or_cancel};
