//! Shared fixtures: a temp workspace laid out as `bootstrap/` next to
//! `infrastructure/`, and a shell-script stand-in for the terraform binary.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const EXPECTED_BACKEND: &str = "\
terraform {
  backend \"s3\" {
    bucket         = \"mybucket\"
    key            = \"terraform_state/statefile.tfstate\"
    region         = \"us-east-1\"
    encrypt        = true
    dynamodb_table = \"mylocks\"
  }
}
";

pub struct Workspace {
    _tmp: TempDir,
    pub root: PathBuf,
    pub bootstrap: PathBuf,
    pub infrastructure: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let bootstrap = root.join("bootstrap");
        let infrastructure = root.join("infrastructure");
        fs::create_dir(&bootstrap).expect("create bootstrap dir");
        fs::create_dir(&infrastructure).expect("create infrastructure dir");
        fs::write(bootstrap.join("main.tf"), "# bootstrap module\n").expect("write main.tf");

        Self {
            _tmp: tmp,
            root,
            bootstrap,
            infrastructure,
        }
    }

    /// Workspace with no bootstrap directory.
    pub fn without_bootstrap() -> Self {
        let ws = Self::new();
        fs::remove_dir_all(&ws.bootstrap).expect("remove bootstrap dir");
        ws
    }

    pub fn backend_file(&self) -> PathBuf {
        self.infrastructure.join("backend.tf")
    }

    pub fn read_backend(&self) -> String {
        fs::read_to_string(self.backend_file()).expect("read backend.tf")
    }
}

/// Behaviour of the stub provisioning tool.
pub struct StubTool {
    pub bucket: String,
    pub region: String,
    pub lock_table: String,
    pub init_code: i32,
    pub apply_code: i32,
}

impl Default for StubTool {
    fn default() -> Self {
        Self {
            bucket: "mybucket".to_string(),
            region: "us-east-1".to_string(),
            lock_table: "mylocks".to_string(),
            init_code: 0,
            apply_code: 0,
        }
    }
}

impl StubTool {
    /// Writes the stub script into `dir` and returns its path.
    ///
    /// Every invocation appends its arguments to `calls.log` next to the
    /// script. The script refuses to run outside a directory containing
    /// `main.tf`, and without `TF_IN_AUTOMATION=1` in its environment, so a
    /// wrong working directory or a dropped variable shows up as a failure.
    #[cfg(unix)]
    pub fn install(&self, dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let log = dir.join("calls.log");
        let script = format!(
            r#"#!/bin/sh
echo "$*" >> '{log}'
[ -f main.tf ] || {{ echo "not a module directory" >&2; exit 65; }}
[ "$TF_IN_AUTOMATION" = "1" ] || {{ echo "TF_IN_AUTOMATION not set" >&2; exit 66; }}
case "$1" in
  init) exit {init_code} ;;
  apply)
    [ "$2" = "-auto-approve" ] || exit 64
    exit {apply_code} ;;
  output)
    [ "$2" = "-raw" ] || exit 64
    case "$3" in
      tf_state_bucket_name) printf '%s' '{bucket}' ;;
      region) printf '%s' '{region}' ;;
      tf_state_lock_table) printf '%s' '{lock_table}' ;;
      *) echo "Output \"$3\" not found" >&2; exit 1 ;;
    esac ;;
  *) exit 64 ;;
esac
"#,
            log = log.display(),
            init_code = self.init_code,
            apply_code = self.apply_code,
            bucket = self.bucket,
            region = self.region,
            lock_table = self.lock_table,
        );

        let path = dir.join("terraform");
        fs::write(&path, script).expect("write stub tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub tool");
        path
    }
}

/// Arguments of every stub invocation, one entry per call.
pub fn stub_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
