pub mod dirs;
pub mod fs;
