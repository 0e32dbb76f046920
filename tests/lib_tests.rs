use clap::Parser;
use graypipe::engine::cli::resolve_opts;
use graypipe::engine::{Cli, luma, output_filename, output_path, parse_output_index, rgb_to_gray};
use graypipe::pipeline::to_gray_item;
use graypipe::utils::config::PackagePaths;
use graypipe::utils::graypipe_toml::{apply_file_to_opts, parse_graypipe_toml};
use graypipe::utils::tempfiles::{publish_temp, temp_path_for};
use graypipe::{Channels, GrayOpts, ItemLedger, Opts, StageError, WorkItem};
use std::path::PathBuf;
use std::sync::Arc;

fn reference_luma(r: u8, g: u8, b: u8) -> f64 {
    (0.2989 * r as f64 + 0.5870 * g as f64 + 0.1140 * b as f64).floor()
}

// --- luma / rgb_to_gray ---

#[test]
fn test_luma_primaries_truncate() {
    assert_eq!(luma(0, 0, 0), 0);
    assert_eq!(luma(255, 0, 0), 76); // 76.2195
    assert_eq!(luma(0, 255, 0), 149); // 149.685
    assert_eq!(luma(0, 0, 255), 29); // 29.07
}

#[test]
fn test_luma_white_is_not_rounded_up() {
    // Weights sum to 0.9999, so full white truncates to 254.
    assert_eq!(luma(255, 255, 255), 254);
}

#[test]
fn test_luma_matches_reference_within_one() {
    for r in (0..=255u8).step_by(17) {
        for g in (0..=255u8).step_by(15) {
            for b in (0..=255u8).step_by(51) {
                let got = luma(r, g, b) as f64;
                assert!((got - reference_luma(r, g, b)).abs() <= 1.0, "{r},{g},{b}");
            }
        }
    }
}

#[test]
fn test_luma_idempotent_on_gray_input() {
    for v in 0..=255u8 {
        let once = luma(v, v, v);
        let twice = luma(once, once, once);
        assert!((v as i16 - once as i16).abs() <= 1, "v={v}");
        assert!((once as i16 - twice as i16).abs() <= 1, "v={v}");
    }
}

#[test]
fn test_rgb_to_gray_one_byte_per_pixel() {
    let rgb = [255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 10, 10];
    let gray = rgb_to_gray(&rgb).unwrap();
    assert_eq!(gray, vec![76, 149, 29, 9]);
}

#[test]
fn test_rgb_to_gray_ignores_partial_pixel() {
    let gray = rgb_to_gray(&[1, 2, 3, 4, 5]).unwrap();
    assert_eq!(gray.len(), 1);
}

#[test]
fn test_rgb_to_gray_empty() {
    assert!(rgb_to_gray(&[]).unwrap().is_empty());
}

// --- WorkItem / ItemLedger ---

#[test]
fn test_work_item_rejects_zero_dimensions() {
    let ledger = Arc::new(ItemLedger::default());
    assert!(WorkItem::new(0, 4, Channels::Gray, vec![], &ledger).is_none());
    assert!(WorkItem::new(4, 0, Channels::Rgb, vec![], &ledger).is_none());
    assert_eq!(ledger.created(), 0);
}

#[test]
fn test_work_item_rejects_wrong_buffer_length() {
    let ledger = Arc::new(ItemLedger::default());
    assert!(WorkItem::new(2, 2, Channels::Rgb, vec![0; 4], &ledger).is_none());
    assert!(WorkItem::new(2, 2, Channels::Gray, vec![0; 12], &ledger).is_none());
    assert_eq!(ledger.created(), 0);
}

#[test]
fn test_work_item_tracks_channels_explicitly() {
    let ledger = Arc::new(ItemLedger::default());
    let rgb = WorkItem::new(2, 1, Channels::Rgb, vec![0; 6], &ledger).unwrap();
    assert_eq!(rgb.channels(), Channels::Rgb);
    assert_eq!(rgb.channels().count(), 3);
    assert_eq!(rgb.pixel_count(), 2);
    let gray = WorkItem::new(2, 1, Channels::Gray, vec![0; 2], &ledger).unwrap();
    assert_eq!(gray.channels().count(), 1);
}

#[test]
fn test_ledger_counts_create_and_release() {
    let ledger = Arc::new(ItemLedger::default());
    let a = WorkItem::new(1, 1, Channels::Gray, vec![7], &ledger).unwrap();
    let b = WorkItem::new(1, 1, Channels::Rgb, vec![1, 2, 3], &ledger).unwrap();
    assert_eq!(ledger.created(), 2);
    assert_eq!(ledger.in_flight(), 2);
    drop(a);
    assert_eq!(ledger.released(), 1);
    drop(b);
    assert_eq!(ledger.released(), 2);
    assert_eq!(ledger.in_flight(), 0);
}

#[test]
fn test_ledger_release_follows_item_across_threads() {
    let ledger = Arc::new(ItemLedger::default());
    let (tx, rx) = crossbeam_channel::unbounded::<WorkItem>();
    tx.send(WorkItem::new(1, 1, Channels::Gray, vec![0], &ledger).unwrap())
        .unwrap();
    drop(tx);
    let handle = std::thread::spawn(move || rx.iter().count());
    assert_eq!(handle.join().unwrap(), 1);
    assert_eq!(ledger.created(), 1);
    assert_eq!(ledger.released(), 1);
}

#[test]
fn test_to_gray_item_keeps_dimensions() {
    let ledger = Arc::new(ItemLedger::default());
    let rgb = WorkItem::new(3, 2, Channels::Rgb, vec![200; 18], &ledger).unwrap();
    let gray = to_gray_item(&rgb, &ledger).unwrap();
    assert_eq!((gray.width(), gray.height()), (3, 2));
    assert_eq!(gray.channels(), Channels::Gray);
    assert_eq!(gray.pixels(), &[luma(200, 200, 200); 6]);
    assert_eq!(ledger.created(), 2);
}

#[test]
fn test_to_gray_item_rejects_gray_input() {
    let ledger = Arc::new(ItemLedger::default());
    let gray = WorkItem::new(2, 1, Channels::Gray, vec![1, 2], &ledger).unwrap();
    let err = to_gray_item(&gray, &ledger).unwrap_err();
    assert!(matches!(
        err,
        StageError::Conversion {
            width: 2,
            height: 1,
            ..
        }
    ));
    assert!(!err.is_fatal());
    assert_eq!(ledger.created(), 1);
}

// --- output naming ---

#[test]
fn test_output_filename_sequence() {
    assert_eq!(output_filename(0), "grayscale_image0.png");
    assert_eq!(output_filename(42), "grayscale_image42.png");
    assert_eq!(
        output_path(&PathBuf::from("/out"), 3),
        PathBuf::from("/out/grayscale_image3.png")
    );
}

#[test]
fn test_parse_output_index() {
    assert_eq!(parse_output_index("grayscale_image0.png"), Some(0));
    assert_eq!(parse_output_index("grayscale_image17.png"), Some(17));
    assert_eq!(parse_output_index("grayscale_image.png"), None);
    assert_eq!(parse_output_index("grayscale_image3.png.tmp"), None);
    assert_eq!(parse_output_index("other3.png"), None);
}

#[test]
fn test_temp_path_is_sibling() {
    let final_path = PathBuf::from("/out/grayscale_image5.png");
    assert_eq!(
        temp_path_for(&final_path),
        PathBuf::from("/out/grayscale_image5.png.tmp")
    );
}

#[test]
fn test_publish_temp_never_replaces_existing() {
    let dir = tempfile::tempdir().unwrap();
    let final_path = dir.path().join("grayscale_image0.png");
    let temp = temp_path_for(&final_path);
    std::fs::write(&final_path, b"first").unwrap();
    std::fs::write(&temp, b"second").unwrap();

    assert!(publish_temp(&temp, &final_path, false).is_err());
    assert_eq!(std::fs::read(&final_path).unwrap(), b"first");

    publish_temp(&temp, &final_path, true).unwrap();
    assert_eq!(std::fs::read(&final_path).unwrap(), b"second");
    assert!(!temp.exists());
}

#[test]
fn test_publish_temp_links_new_file_and_drops_temp() {
    let dir = tempfile::tempdir().unwrap();
    let final_path = dir.path().join("grayscale_image1.png");
    let temp = temp_path_for(&final_path);
    std::fs::write(&temp, b"gray").unwrap();

    publish_temp(&temp, &final_path, false).unwrap();

    assert_eq!(std::fs::read(&final_path).unwrap(), b"gray");
    assert!(!temp.exists());
}

// --- errors ---

#[test]
fn test_stage_error_fatality() {
    let decode = StageError::Decode {
        path: PathBuf::from("a.png"),
        reason: "bad".into(),
    };
    let open = StageError::DirectoryOpen {
        path: PathBuf::from("in"),
        reason: "missing".into(),
    };
    assert!(!decode.is_fatal());
    assert!(open.is_fatal());
    assert!(StageError::Allocation { width: 1, height: 1 }.is_fatal());
    assert!(decode.to_string().contains("a.png"));
    assert!(decode.to_string().contains("bad"));
}

#[test]
fn test_stage_error_serializes_with_kind() {
    let err = StageError::Persist {
        path: PathBuf::from("out/grayscale_image0.png"),
        reason: "disk full".into(),
    };
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "persist");
    assert_eq!(json["reason"], "disk full");
}

// --- config file / CLI precedence ---

#[test]
fn test_package_paths_from_crate_name() {
    let paths = PackagePaths::get();
    assert_eq!(paths.pkg_name(), "graypipe");
    assert_eq!(paths.config_filename(), ".graypipe.toml");
}


#[test]
fn test_toml_applies_only_present_fields() {
    let file = parse_graypipe_toml(
        r#"
        [settings]
        source = "photos"
        start_index = 5
        overwrite = true
        "#,
    )
    .unwrap();
    let mut opts = Opts {
        dest: PathBuf::from("keep"),
        ..Opts::default()
    };
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.source, PathBuf::from("photos"));
    assert_eq!(opts.dest, PathBuf::from("keep"));
    assert_eq!(opts.start_index, 5);
    assert!(opts.overwrite);
    assert!(!opts.verbose);
}

#[test]
fn test_toml_empty_file_is_valid() {
    let file = parse_graypipe_toml("").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.start_index, 0);
}

#[test]
fn test_toml_rejects_wrong_types() {
    assert!(parse_graypipe_toml("[settings]\nstart_index = \"x\"").is_err());
}

#[test]
fn test_resolve_opts_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cli = Cli::try_parse_from(["graypipe"]).unwrap();
    let opts = resolve_opts(&cli, dir.path());
    assert_eq!(opts.source, PathBuf::from("images"));
    assert_eq!(opts.dest, PathBuf::from("output"));
    assert_eq!(opts.start_index, 0);
    assert!(!opts.overwrite);
}

#[test]
fn test_resolve_opts_cli_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".graypipe.toml"),
        "[settings]\nsource = \"from_file\"\ndest = \"file_out\"\nstart_index = 3\nverbose = true\n",
    )
    .unwrap();
    let cli = Cli::try_parse_from(["graypipe", "from_cli", "-s", "9", "--overwrite"]).unwrap();
    let opts = resolve_opts(&cli, dir.path());
    assert_eq!(opts.source, PathBuf::from("from_cli"));
    assert_eq!(opts.dest, PathBuf::from("file_out"));
    assert_eq!(opts.start_index, 9);
    assert!(opts.verbose);
    assert!(opts.overwrite);
}

#[test]
fn test_gray_opts_to_opts() {
    let lib = GrayOpts {
        follow_links: true,
        start_index: 2,
        overwrite: true,
    };
    let opts = lib.to_opts(PathBuf::from("in"), PathBuf::from("out"));
    assert_eq!(opts.source, PathBuf::from("in"));
    assert_eq!(opts.dest, PathBuf::from("out"));
    assert!(opts.follow_links);
    assert_eq!(opts.start_index, 2);
    assert!(!opts.progress);
}
