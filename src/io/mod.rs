pub mod dataset;
pub mod map;
pub mod trajectory;
pub use trajectory::{format_scalar, write_trajectory, TimestampColumn};
