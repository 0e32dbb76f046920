//! Application configuration constants.
//! Naming, defaults and conversion weights in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the working directory (e.g. `.graypipe.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Directories ----

/// Defaults used when neither the CLI nor the config file names a directory.
pub struct DefaultDirs;

impl DefaultDirs {
    pub const SOURCE: &'static str = "images";
    pub const DEST: &'static str = "output";
}

// ---- Output naming ----

/// Output files are `<STEM><N>.<EXTENSION>`.
pub struct OutputNaming;

impl OutputNaming {
    pub const STEM: &'static str = "grayscale_image";
    pub const EXTENSION: &'static str = "png";
    /// Appended to the final name while the encoder is writing.
    pub const TEMP_SUFFIX: &'static str = "tmp";
}

// ---- Grayscale ----

/// Luma weights applied to R, G and B. The result is truncated to `u8`.
pub struct LumaWeights;

impl LumaWeights {
    pub const R: f64 = 0.2989;
    pub const G: f64 = 0.5870;
    pub const B: f64 = 0.1140;
}
