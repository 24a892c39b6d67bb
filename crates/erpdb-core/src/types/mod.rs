mod generator;
mod id;
mod timestamp;

pub use generator::{Generator, IdError};
pub use id::RecordId;
pub use timestamp::{Clock, ManualClock, Stamper, SystemClock, Timestamp, TimestampError};
