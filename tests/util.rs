//! Shared test utilities for integration tests
//!
//! Fixture trees and a preconfigured `twinscan` command.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use std::process::Command;

pub const DUPLICATE: &str = "def foo():\n    return 1\n";
pub const UNRELATED: &str = "class X: pass\n";

/// `a.py` and `b.py` are identical, `c.py` shares nothing with them.
pub fn scenario() -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("a.py")
        .write_str(DUPLICATE)
        .expect("write a.py");
    tmp.child("b.py")
        .write_str(DUPLICATE)
        .expect("write b.py");
    tmp.child("c.py")
        .write_str(UNRELATED)
        .expect("write c.py");

    tmp
}

/// Binary running inside `dir`, without colors or inherited log filters.
pub fn twinscan(dir: &assert_fs::TempDir) -> Command
{
    let mut cmd = Command::cargo_bin("twinscan").expect("twinscan binary");
    cmd.current_dir(dir.path())
        .env_remove("TWINSCAN_LOG")
        .arg("--no-color");
    cmd
}
