use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use super::fixtures::load_fixture;

/// TestHarness provides an isolated working directory for running the texdag
/// binary. HOME points into the directory so no global config leaks in.
pub struct TestHarness {
    pub dir: TempDir,
    pub texdag_binary: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("home")).expect("Failed to create home dir");

        TestHarness {
            dir,
            texdag_binary: PathBuf::from(env!("CARGO_BIN_EXE_texdag")),
        }
    }

    /// Creates a harness holding copies of the named fixtures.
    #[allow(dead_code)]
    pub fn with_fixtures(names: &[&str]) -> Self {
        let harness = Self::new();
        for name in names {
            harness.write(name, &load_fixture(name));
        }
        harness
    }

    /// Returns the base directory path (the TempDir path).
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative` inside the harness, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Executes the texdag binary with the given arguments in the harness directory.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.texdag_binary)
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path().join("home"))
            .env("NO_COLOR", "1")
            .env_remove("TEXDAG_QUIET")
            .env_remove("TEXDAG_LOG")
            .output()
            .expect("Failed to run texdag")
    }
}
