use std::fs;
use std::path::PathBuf;

use iisman_core::Protocol;
use iisman_host::listing::{column_boundaries, normalize_lines, parse_listing};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture {}", path.display()))
}

#[test]
fn test_fixture_boundaries_match_the_five_dash_runs() {
    let raw = fixture("get-website.txt");
    let lines = normalize_lines(&raw);
    let boundaries = column_boundaries(lines[1]);

    assert_eq!(boundaries.len(), 5);
    assert!(boundaries.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(boundaries[0], 0);
}

#[test]
fn test_fixture_parses_valid_rows_and_skips_the_ftp_row() {
    let listing = parse_listing(&fixture("get-website.txt")).unwrap();

    // Five data rows, one of which carries an unsupported protocol.
    assert_eq!(listing.sites.len(), 4);
    assert_eq!(listing.warnings.len(), 1);
    assert!(listing.warnings[0].contains("invalid binding: ftp *:21"));

    let names: Vec<&str> = listing.sites.iter().map(|site| site.name.as_str()).collect();
    assert_eq!(names, vec!["Default Web Site", "intranet", "api", "metrics"]);
}

#[test]
fn test_fixture_decodes_binding_variants() {
    let listing = parse_listing(&fixture("get-website.txt")).unwrap();

    let default_site = &listing.sites[0];
    assert_eq!(default_site.id, 1);
    assert_eq!(default_site.binding.protocol, Protocol::Http);
    assert_eq!(default_site.binding.port, 80);
    assert_eq!(default_site.binding.host, "localhost");
    assert!(!default_site.binding.ssl);

    let intranet = &listing.sites[1];
    assert_eq!(intranet.binding.protocol, Protocol::Https);
    assert_eq!(intranet.binding.host, "intranet.corp.local");
    assert!(intranet.binding.ssl);

    let api = &listing.sites[2];
    assert_eq!(api.id, 42);
    assert_eq!(api.binding.port, 8081);
    assert_eq!(api.binding.host, "api.corp.local");

    let metrics = &listing.sites[3];
    assert_eq!(metrics.state, "Stopped");
    assert_eq!(metrics.binding.protocol, Protocol::Udp);
    assert_eq!(metrics.physical_path, r"C:\inetpub\wwwroot\metrics");
}

#[test]
fn test_fixture_parse_is_idempotent() {
    let raw = fixture("get-website.txt");
    assert_eq!(parse_listing(&raw).unwrap(), parse_listing(&raw).unwrap());
}
