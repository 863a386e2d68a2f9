use assert_cmd::assert::Assert;
use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::str as p_str;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::FIXTURE_ROOT_PATH;

const DEFAULT_SCHEMA_PATH: &str = "schema.graphql";

/// Represents an instance of the relay2ts command, run against a temp directory
#[derive(Debug)]
pub struct TestCommandHarness {
    proc_cmd: Command,
    temp_dir: assert_fs::TempDir,
}

impl Default for TestCommandHarness {
    fn default() -> Self {
        Self::new_with_default_schema()
    }
}

impl TestCommandHarness {
    pub fn new() -> Self {
        // If user adds `KEEP_TEST_TEMPDIRS` arg to `cargo test`, we can keep temp_dir
        let temp_dir = assert_fs::TempDir::new()
            .expect("temp directory creation failure")
            .into_persistent_if(env::var_os("KEEP_TEST_TEMPDIRS").is_some());

        let mut proc_cmd = Command::cargo_bin("relay2ts").expect("relay2ts bin failure");
        proc_cmd
            .env("NO_COLOR", "1")
            .env_remove("RELAY2TS_LOG")
            .arg("--root-dir")
            .arg(temp_dir.path());

        // If user adds `--nocapture` arg to `cargo test`, we can show output
        if env::args().any(|arg| arg == "--nocapture") {
            proc_cmd.stdin(Stdio::inherit());
            proc_cmd.stderr(Stdio::inherit());
        }

        Self { proc_cmd, temp_dir }
    }

    pub fn new_with_default_schema() -> Self {
        let mut harness = Self::new();
        harness.with_file_from_path(
            DEFAULT_SCHEMA_PATH,
            &Path::new(FIXTURE_ROOT_PATH).join("schema.graphql"),
        );
        let schema_path = harness.child_path(DEFAULT_SCHEMA_PATH);
        harness.with_arg("--schema").with_arg(schema_path);
        harness
    }

    pub fn child_path(&self, name: &str) -> PathBuf {
        self.temp_dir.child(name).path().to_path_buf()
    }

    pub fn with_arg(&mut self, arg: impl AsRef<std::ffi::OsStr>) -> &mut Self {
        self.proc_cmd.arg(arg);
        self
    }

    pub fn with_file(&mut self, name: &str, contents: &str) -> &mut Self {
        self.temp_dir
            .child(name)
            .write_str(contents)
            .expect("write file failure");
        self
    }

    pub fn with_file_from_path(&mut self, name: &str, path: &Path) -> &mut Self {
        self.temp_dir
            .child(name)
            .write_file(path)
            .expect("copy file failure");
        self
    }

    /// Writes a source file and passes it to the command.
    pub fn with_source_file(&mut self, name: &str, contents: &str) -> &mut Self {
        self.with_file(name, contents);
        let path = self.child_path(name);
        self.with_arg(path)
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.child_path(name)).expect("read file failure")
    }

    pub fn run(&mut self) -> Assert {
        self.proc_cmd.assert()
    }

    pub fn run_for_failure(&mut self) -> Assert {
        self.proc_cmd.assert().failure().stderr(p_str::is_empty())
    }

    pub fn run_for_success(&mut self) -> Assert {
        self.proc_cmd.assert().success().stderr(p_str::is_empty())
    }
}
