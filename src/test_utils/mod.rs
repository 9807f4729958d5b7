pub mod misc;
pub mod templates;
pub mod player_templates;
pub mod run_builder;

pub use misc::*;
pub use templates::*;
pub use player_templates::*;
pub use run_builder::*;
