pub mod cmd;
pub mod common;
pub mod contracts;
pub mod encode;
pub mod ops;

mod utils;
