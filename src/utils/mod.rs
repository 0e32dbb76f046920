pub mod config;
pub mod graypipe_toml;
pub mod logger;
pub mod tempfiles;

pub use config::*;
pub use graypipe_toml::{apply_file_to_opts, load_graypipe_toml};
pub use logger::{Colors, setup_logging};
pub use tempfiles::{publish_temp, remove_temp, rename_temp_to_final, temp_path_for};
