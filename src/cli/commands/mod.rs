//! CLI command implementations

pub mod add;
pub mod cache;
pub mod config;
pub mod run;

pub use add::execute as add;
pub use cache::execute as cache;
pub use config::execute as config;
pub use run::execute as run;
