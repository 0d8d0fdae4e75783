mod datasets;
pub(crate) use datasets::{sample_memory_dataset, sample_oxford_dataset, MemoryDataset, SampleDataset};
mod maps;
pub(crate) use maps::{sample_keyframes, FakeMap, MatcherCalls};
mod sessions;
pub(crate) use sessions::FakeBackend;
