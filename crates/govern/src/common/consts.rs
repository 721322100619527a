/// Names for the default directories and files.
pub const DEFAULT_ROOT_DIR: &str = ".govern";
pub const CONFIG_FILENAME: &str = "config.yml";
