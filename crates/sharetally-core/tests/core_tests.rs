use sharetally_core::units::{DAY, GB, KB, MB, TB, parse_age, parse_size};
use sharetally_core::{
    LineFormat, RollupConfig, RollupError, ScanRoot, age_to_seconds, bytes_to_size, seconds_to_age,
    size_to_bytes,
};

#[test]
fn test_size_conversions_from_scanner_output() {
    assert_eq!(size_to_bytes("1MiB"), 1_048_576);
    assert_eq!(size_to_bytes("1.5GiB"), 1_610_612_736);
    assert_eq!(size_to_bytes("729"), 729);
    assert_eq!(size_to_bytes("bogus"), 0);
    assert_eq!(size_to_bytes("3.25kib"), 3328);
}

#[test]
fn test_kb_and_kib_are_identical() {
    for (short, long) in [("5KB", "5KiB"), ("5MB", "5MiB"), ("5GB", "5GiB"), ("5TB", "5TiB")] {
        assert_eq!(size_to_bytes(short), size_to_bytes(long));
    }
}

#[test]
fn test_display_thresholds_match_multipliers() {
    for (unit, label) in [(KB, "KB"), (MB, "MB"), (GB, "GB"), (TB, "TB")] {
        assert_eq!(bytes_to_size(unit), format!("1.00 {label}"));
        assert!(!bytes_to_size(unit - 1).ends_with(&format!(" {label}")));
    }
    assert_eq!(bytes_to_size(size_to_bytes("1KiB") - 1), "1023 B");
}

#[test]
fn test_display_of_parsed_sizes() {
    assert_eq!(bytes_to_size(size_to_bytes("4.0KiB")), "4.00 KB");
    assert_eq!(bytes_to_size(size_to_bytes("1.5GiB")), "1.50 GB");
}

#[test]
fn test_age_conversions_from_scanner_output() {
    assert_eq!(age_to_seconds("59d4h"), 59 * 86400 + 4 * 3600);
    assert_eq!(age_to_seconds("+0s"), 0);
    assert_eq!(age_to_seconds("7y0d"), 7 * 365 * 86400);
    assert_eq!(age_to_seconds("4h1d"), DAY + 4 * 3600);
    assert_eq!(age_to_seconds("1d1d"), 2 * DAY);
}

#[test]
fn test_fallbacks_are_distinguishable() {
    assert_eq!(parse_size("0"), Some(0));
    assert_eq!(parse_size("nope"), None);
    assert_eq!(parse_age("0s"), Some(0));
    assert_eq!(parse_age("nope"), None);
    assert_eq!(age_to_seconds("nope"), 0);
}

#[test]
fn test_age_display_roundtrip() {
    for seconds in [0, 1, 59, 60, 3_599, 86_400, 172_800, 213_840, 7 * 365 * 86_400 + 17] {
        assert_eq!(age_to_seconds(&seconds_to_age(seconds)), seconds);
    }
}

#[test]
fn test_scan_root_from_config() {
    let config = RollupConfig::new(r"\\fs01\projects\path");
    let root = config.scan_root().unwrap();
    assert_eq!(root.server(), "fs01");
    assert_eq!(root.share(), "projects");
    assert_eq!(root.relative_base(), "path");

    let bad = RollupConfig::new("projects/path");
    assert!(matches!(bad.scan_root(), Err(RollupError::InvalidRoot { .. })));
}

#[test]
fn test_scan_root_parses_via_from_str() {
    let root: ScanRoot = r"\\fs01\projects".parse().unwrap();
    assert_eq!(root.parent(), r"\\fs01");
}

#[test]
fn test_config_defaults() {
    let config = RollupConfig::new(r"\\fs01\projects");
    assert_eq!(config.parallel, 8);
    assert_eq!(config.level, 1);
    assert_eq!(config.progress_interval, 10_000);
    assert_eq!(config.max_error_lines, 1000);
    assert!(config.scanner.is_none());
    assert_eq!(config.formats, vec![LineFormat::Dense, LineFormat::Legacy]);
}

#[test]
fn test_config_serde_defaults() {
    let config: RollupConfig = serde_json::from_str(r#"{"root": "\\\\fs01\\projects"}"#).unwrap();
    assert_eq!(config.root, r"\\fs01\projects");
    assert_eq!(config.parallel, 8);
    assert_eq!(config.formats.len(), 2);
}
