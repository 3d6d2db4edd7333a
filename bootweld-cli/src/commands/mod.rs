//! Command implementations for the Bootweld CLI.

pub mod assemble;
pub mod list;

pub use assemble::cmd_assemble;
pub use list::cmd_list;
