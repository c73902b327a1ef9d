//! Common test utilities for skiff integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary working directory holding compose files for one test
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory, removed on drop
    pub temp: TempDir,
    /// Path to the workspace root
    pub path: PathBuf,
}

/// A compose file with three services and untouched extra sections
pub const THREE_SERVICES: &str = r#"x-project:
  owner: platform

services:
  web:
    image: nginx:latest
    ports:
      - "8080:80"
  db:
    image: postgres:16
    environment:
      POSTGRES_PASSWORD: secret
  cache:
    image: redis:7

networks:
  backend:
    driver: bridge

volumes:
  db-data: {}
"#;

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the workspace
    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.path.join(name), content).expect("Failed to write file");
    }

    /// Write content as docker-compose.yml
    pub fn write_compose(&self, content: &str) {
        self.write_file("docker-compose.yml", content);
    }

    /// Read a file from the workspace
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path.join(name)).expect("Failed to read file")
    }

    /// Check if a file exists in the workspace
    pub fn file_exists(&self, name: &str) -> bool {
        self.path.join(name).exists()
    }

    /// Install a stub compose binary that records its arguments to args.txt
    /// and its stdin to stdin.txt in the working directory, then exits with
    /// $STUB_EXIT (default 0). Returns the absolute path to the stub.
    #[cfg(unix)]
    pub fn write_stub_compose_bin(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = "#!/bin/sh\nprintf '%s' \"$*\" > args.txt\ncat > stdin.txt\nexit \"${STUB_EXIT:-0}\"\n";
        let bin_path = self.path.join("compose-stub");
        std::fs::write(&bin_path, script).expect("Failed to write stub binary");

        let mut perms = std::fs::metadata(&bin_path)
            .expect("Failed to stat stub binary")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&bin_path, perms).expect("Failed to chmod stub binary");

        bin_path
    }
}
