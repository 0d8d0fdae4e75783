mod core;
pub use self::core::{Dataset, DatasetError, DatasetItem};

mod oxford;
pub use oxford::OxfordDataset;
