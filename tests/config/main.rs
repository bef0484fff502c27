
use std::{
    fs,
    path::{Path, PathBuf},
};

use uuid::Uuid;

pub struct TempConfigDir {
    pub dir: PathBuf,
}

impl TempConfigDir {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("paramforge-config-test-{}", Uuid::now_v7()));
        fs::create_dir_all(&dir).expect("temp dir should be created");
        fs::copy(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("paramforge.schema.json"),
            dir.join("paramforge.schema.json"),
        )
        .expect("schema should be copied");
        Self { dir }
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, content).expect("config should be written");
        path
    }
}

impl Drop for TempConfigDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}
