pub mod file_system;
pub mod settings_manager;
pub mod token_provider;
pub mod report_api;
pub mod persister;

pub use file_system::*;
pub use settings_manager::*;
pub use token_provider::*;
pub use report_api::*;
pub use persister::*;
