pub mod config;
pub mod document;
pub mod project;
pub mod seed;
pub mod task;
pub mod user;

pub use config::*;
pub use document::*;
pub use project::*;
pub use seed::*;
pub use task::*;
pub use user::*;
