pub mod app;
pub mod cli;
pub mod console;
pub mod form;
pub mod map;
pub mod persistence;
pub mod render;
pub mod runtime;
pub mod store;
pub mod types;
pub mod utils;

pub use app::App;
