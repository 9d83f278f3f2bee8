pub mod task;
pub mod page;
pub mod board;
pub mod config;

pub use task::*;
pub use page::*;
pub use board::*;
pub use config::*;
