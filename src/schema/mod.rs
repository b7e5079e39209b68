pub mod ddl;
pub mod tables;
pub mod types;
pub mod views;

pub use ddl::*;
pub use tables::*;
pub use types::*;
pub use views::*;
