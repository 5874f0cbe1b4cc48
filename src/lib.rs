//! Simple to use cli for logging study sessions and seeing how consistent you are.
//! Sessions are kept in a single local file, and the yearly heat map is drawn right in the
//! terminal.
//!

pub mod cli;
pub mod storage;
pub mod tracking;
pub mod utils;
