//! 平台相关输出

mod cli;

pub use cli::{format_error_chain, print_error_chain};
