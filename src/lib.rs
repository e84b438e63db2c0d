pub mod core;
pub mod db;
pub mod error;
pub mod external;
pub mod models;
pub mod output;
