pub mod controller;
pub mod domain;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod model;
pub mod paths;
pub mod render;
pub mod store;
pub mod table;

pub use domain::{Message, TVConfig, TVError};
pub use filter::{FilterSpec, filter_by_columns, filter_by_term};
pub use paths::parse_path_list;
pub use store::TableStore;
pub use table::{Cell, Table};
