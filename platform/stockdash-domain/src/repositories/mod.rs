pub mod snapshot;
pub mod tick_source;
