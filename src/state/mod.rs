//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `WorkerState`: the phase a crawl worker is in while it handles one URL

mod worker_state;

pub use worker_state::WorkerState;
