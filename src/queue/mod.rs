//! Operation Serializer
//!
//! One FIFO queue per store, so at most one read-modify-write cycle runs
//! against a given history file at any time.
//!
//! ```text
//! add ──┐
//! remove┼──► QueueRegistry ──► SerialQueue(path) ──► worker: job, job, job ...
//! clear ┘      (path → queue)                        (one at a time, FIFO)
//! ```

mod registry;
mod serial;

pub use registry::QueueRegistry;
pub use serial::SerialQueue;
