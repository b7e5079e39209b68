pub mod cli;
pub mod error;
pub mod loader;
pub mod query;
pub mod schema;
pub mod store;

pub use cli::{Cli, Commands};
pub use error::{Error, Result};
pub use loader::LoadSummary;
pub use store::{bootstrap, Store, StoreConfig};
