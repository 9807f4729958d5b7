#[cfg(test)]
mod test_utils;

pub mod abstractions;
pub mod boss_resolver;
pub mod constants;
pub mod debuff_tracker;
pub mod error;
pub mod graph;
pub mod models;
pub mod start;
pub mod utils;

pub use error::FetchError;
pub use start::start;
pub use start::StartOptions;
