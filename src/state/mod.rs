pub mod history;
pub mod ids;
pub mod store;

pub use history::Scope;
pub use ids::IdGen;
pub use store::{Store, StoreError};
