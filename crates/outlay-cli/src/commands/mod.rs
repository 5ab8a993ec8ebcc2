//! Command implementations

mod ai;
mod core;
mod expenses;
mod process;
mod serve;

pub use ai::cmd_ai_test;
pub use core::{cmd_init, open_db};
pub use expenses::cmd_expenses;
pub use process::cmd_process;
pub use serve::cmd_serve;
