pub mod builder;
pub mod reports;

pub use builder::*;
pub use reports::*;
