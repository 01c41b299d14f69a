#![allow(dead_code)]

use std::{fs, path::PathBuf};

use tempfile::TempDir;

pub const EN_CATALOG: &str = "[hello]\nother = \"Hello, {{.name}}!\"\n";

/// Temporary translations directory holding `active.en.toml` and an empty
/// `active.fr.toml`.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self::empty();
        fixture.write("active.en.toml", EN_CATALOG);
        fixture.write("active.fr.toml", "");
        fixture
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn mkdir(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }
}

pub fn langid(s: &str) -> lingo::LanguageIdentifier {
    s.parse().unwrap()
}
