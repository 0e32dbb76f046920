//! CLI command handler: build options from defaults, .graypipe.toml and flags, then run the pipeline.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::progress::setup_progress;
use crate::pipeline::{check_for_failures, process_dir};
use crate::utils::config::{DefaultDirs, PackagePaths};
use crate::utils::{apply_file_to_opts, load_graypipe_toml, setup_logging};

/// Overwrite opts field from a CLI flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $cli.$field {
            $opts.$field = v;
        }
    };
}

/// Resolve options: defaults < config file in `config_dir` < CLI flags.
pub fn resolve_opts(cli: &Cli, config_dir: &Path) -> Opts {
    let mut opts = Opts {
        source: PathBuf::from(DefaultDirs::SOURCE),
        dest: PathBuf::from(DefaultDirs::DEST),
        ..Opts::default()
    };
    if let Some(file) = load_graypipe_toml(config_dir) {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(ref p) = cli.source {
        opts.source = p.clone();
    }
    if let Some(ref p) = cli.dest {
        opts.dest = p.clone();
    }
    apply_cli_opt!(cli, opts, verbose);
    apply_cli_opt!(cli, opts, follow_links);
    apply_cli_opt!(cli, opts, start_index);
    apply_cli_opt!(cli, opts, overwrite);
    apply_cli_opt!(cli, opts, progress);
    opts.json = cli.json;
    opts
}

/// Run the pipeline for the CLI. Returns an error (non-zero exit) when anything failed
/// or the run was cancelled with Ctrl+C.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = resolve_opts(cli, Path::new("."));
    setup_logging(opts.verbose);
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let (bar, on_written) = setup_progress(opts.progress);
    let report = process_dir(&opts, cancel_requested, on_written)?;
    drop(bar);
    if opts.progress {
        eprintln!();
    }

    if opts.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize run report")?
        );
    }
    check_for_failures(&opts, &report)
}
