//! Engine module: CLI surface and the leaf operations the stages call

pub mod arg_parser;
pub mod cli;
pub mod codec;
pub mod grayscale;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use codec::{RgbRaster, decode_rgb, encode_gray_png};
pub use grayscale::{luma, rgb_to_gray};
pub use tools::{ensure_dest_dir, output_filename, output_path, parse_output_index};
