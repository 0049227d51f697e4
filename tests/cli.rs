mod util;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use clap::Parser;
use predicates::prelude::*;
use std::process::Command;
use twinscan::cli::{Cli, Commands, ScanArgs};

#[test]
fn scan_flag_parsing()
{
    // Given
    let argv = vec![
        "twinscan",
        "--quiet",
        "scan",
        "--directories",
        "src",
        "lib",
        "--ignore-directories",
        "src/vendor",
        "--project-root-dir",
        ".",
        "--warn-threshold",
        "80",
        "--markdown",
        "report.md",
    ];

    // When
    let cli = Cli::parse_from(argv);

    // Then
    assert!(cli.quiet);
    match cli.command
    {
        Commands::Scan(ScanArgs { directories, ignore_directories, warn_threshold, markdown, files, .. }) =>
        {
            assert_eq!(directories.len(), 2);
            assert_eq!(ignore_directories.len(), 1);
            assert!(files.is_empty());
            assert_eq!(warn_threshold, Some(80));
            assert!(
                markdown
                    .expect("markdown path")
                    .ends_with("report.md")
            );
        }
        _ => panic!("expected Scan command"),
    }
}

#[test]
fn scan_without_sources_is_a_usage_error()
{
    Command::cargo_bin("twinscan")
        .unwrap()
        .arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--directories"));
}

#[test]
fn init_writes_config_once()
{
    let dir = assert_fs::TempDir::new().unwrap();

    util::twinscan(&dir)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));

    dir.child("twinscan.toml")
        .assert(predicate::str::contains("fail_threshold = 100"))
        .assert(predicate::str::contains("[report]"));

    util::twinscan(&dir)
        .args(["init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));

    util::twinscan(&dir)
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn idf_help_names_the_gensim_compatible_formula()
{
    Command::cargo_bin("twinscan")
        .unwrap()
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default: smoothed"))
        .stdout(predicate::str::contains("gensim's log2(N/df)"));
}

#[test]
fn completions_print_to_stdout()
{
    Command::cargo_bin("twinscan")
        .unwrap()
        .args(["completions", "bash", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("twinscan"));
}
