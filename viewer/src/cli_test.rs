use crate::{cli::Args, render::OutputFormat};
use clap::Parser;
use glt_discovery::{config::DEFAULT_TIMEOUT, SourceConfig};
use std::path::PathBuf;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("glt-viewer").chain(args.iter().copied())).unwrap()
}

#[test]
pub fn defaults_without_flags() {
    let args = parse(&[]);
    let config = args.discovery_config().unwrap();

    assert_eq!(args.format, OutputFormat::Text);
    assert_eq!(
        config.source,
        SourceConfig::Directory {
            path: PathBuf::from("output")
        }
    );
    assert_eq!(config.threshold, 8);
}

#[test]
pub fn url_flag_selects_http_source() {
    let config = parse(&["--url", "http://localhost:8000/", "--threshold", "3"])
        .discovery_config()
        .unwrap();

    match config.source {
        SourceConfig::Http { url, timeout } => {
            assert_eq!(url.as_str(), "http://localhost:8000/");
            assert_eq!(timeout, DEFAULT_TIMEOUT);
        }
        other => panic!("expected http source, got {other:?}"),
    }
    assert_eq!(config.threshold, 3);
}

#[test]
pub fn flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("viewer.yaml");
    std::fs::write(
        &path,
        "source:\n  http:\n    url: http://ci.example.org/\n    timeout: 100\nthreads: 2\n",
    )
    .unwrap();

    let config = parse(&[
        "--config",
        path.to_str().unwrap(),
        "--timeout",
        "250",
        "--threads",
        "6",
        "--format",
        "json",
    ])
    .discovery_config()
    .unwrap();

    assert_eq!(
        config.source,
        SourceConfig::Http {
            url: "http://ci.example.org/".parse().unwrap(),
            timeout: 250
        }
    );
    assert_eq!(config.threads, Some(6));
}

#[test]
pub fn dir_flag_replaces_http_source() {
    let config = parse(&["--dir", "/srv/output", "--timeout", "10"])
        .discovery_config()
        .unwrap();

    assert_eq!(
        config.source,
        SourceConfig::Directory {
            path: PathBuf::from("/srv/output")
        }
    );
}

#[test]
pub fn url_and_dir_conflict() {
    let result = Args::try_parse_from([
        "glt-viewer",
        "--url",
        "http://localhost/",
        "--dir",
        "output",
    ]);

    assert!(result.is_err());
}
