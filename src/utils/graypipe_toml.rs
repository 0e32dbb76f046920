//! Load `.graypipe.toml` from a directory (CLI only). Lib callers pass [`GrayOpts`](crate::GrayOpts) instead.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct GraypipeToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    source: Option<String>,
    dest: Option<String>,
    verbose: Option<bool>,
    follow_links: Option<bool>,
    start_index: Option<usize>,
    overwrite: Option<bool>,
    progress: Option<bool>,
}

/// Load the package config file from `dir` if present. Returns None if the file is
/// missing; a malformed file is logged and ignored.
pub fn load_graypipe_toml(dir: &Path) -> Option<GraypipeToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_graypipe_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_graypipe_toml(s: &str) -> Result<GraypipeToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &GraypipeToml, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(ref p) = sec.source {
        opts.source = PathBuf::from(p);
    }
    if let Some(ref p) = sec.dest {
        opts.dest = PathBuf::from(p);
    }
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, follow_links => follow_links);
    apply_file_opt!(sec, opts, start_index => start_index);
    apply_file_opt!(sec, opts, overwrite => overwrite);
    apply_file_opt!(sec, opts, progress => progress);
}
