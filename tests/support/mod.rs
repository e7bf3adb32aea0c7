use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A temporary planner data dir with a fixed test user.
pub struct TestPlanner {
    dir: TempDir,
    user: String,
}

impl TestPlanner {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
            user: "testuser".to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A `studyplan` command pointed at this planner's data dir and user
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("studyplan").expect("binary");
        cmd.env("STUDYPLAN_DATA_DIR", self.dir.path());
        cmd.env("STUDYPLAN_USER", &self.user);
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// A command with no user configured at all
    pub fn cmd_without_user(&self) -> Command {
        let mut cmd = Command::cargo_bin("studyplan").expect("binary");
        cmd.env("STUDYPLAN_DATA_DIR", self.dir.path());
        cmd.env_remove("STUDYPLAN_USER");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Add a task through the CLI and return its id from the JSON envelope
    pub fn add_task(&self, args: &[&str]) -> String {
        let output = self
            .cmd()
            .arg("add")
            .args(args)
            .arg("--json")
            .output()
            .expect("run add");
        assert!(
            output.status.success(),
            "add failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let envelope: Value =
            serde_json::from_slice(&output.stdout).expect("add emits valid JSON");
        envelope["data"]["id"]
            .as_str()
            .expect("created task has an id")
            .to_string()
    }

    /// Run a subcommand with `--json` and parse the envelope's `data`
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .output()
            .expect("run command");
        assert!(
            output.status.success(),
            "command {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let envelope: Value =
            serde_json::from_slice(&output.stdout).expect("command emits valid JSON");
        assert_eq!(envelope["schema_version"], "studyplan.v1");
        assert_eq!(envelope["status"], "success");
        envelope["data"].clone()
    }
}
