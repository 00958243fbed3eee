use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

pub fn run_callscribe(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
    work: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
            work: tempfile::tempdir().expect("create temporary working dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_callscribe"))
            .args(args)
            .current_dir(self.work.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("ASSEMBLYAI_API_KEY")
            .env_remove("HF_API_TOKEN")
            .output()
            .expect("failed to execute callscribe binary")
    }

    #[allow(dead_code)]
    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.work.path().join(name);
        std::fs::write(&path, contents).expect("write test input file");
        path
    }
}
