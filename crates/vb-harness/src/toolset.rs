//! Localisation des exécutables `vbc` par version.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};

pub trait CompilerToolset: Send + Sync {
    fn vb_compiler(&self, version: &str) -> Result<PathBuf>;
}

/// Overrides explicites, puis `<root>/<version>/vbc[.exe]`.
///
/// Sans override ni racine : nom nu, résolu sur `PATH` au lancement.
#[derive(Debug, Clone, Default)]
pub struct DirectoryToolset {
    root: Option<PathBuf>,
    overrides: BTreeMap<String, PathBuf>,
}

impl DirectoryToolset {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()), overrides: BTreeMap::new() }
    }

    pub fn from_config(cfg: &HarnessConfig) -> Self {
        Self { root: cfg.toolset_dir.clone(), overrides: cfg.compilers.clone() }
    }

    pub fn with_override(mut self, version: &str, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(version.to_owned(), path.into());
        self
    }
}

fn exe_name() -> &'static str {
    if cfg!(windows) { "vbc.exe" } else { "vbc" }
}

impl CompilerToolset for DirectoryToolset {
    fn vb_compiler(&self, version: &str) -> Result<PathBuf> {
        let candidate = match (self.overrides.get(version), &self.root) {
            (Some(p), _) => p.clone(),
            (None, Some(root)) => root.join(version).join(exe_name()),
            (None, None) => return Ok(PathBuf::from(exe_name())),
        };
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(HarnessError::ToolNotFound { version: version.to_owned(), searched: candidate })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_versioned_layout() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("2.10.0").join(exe_name());
        std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
        std::fs::write(&exe, "").unwrap();

        let ts = DirectoryToolset::new(dir.path());
        assert_eq!(ts.vb_compiler("2.10.0").unwrap(), exe);
        match ts.vb_compiler("1.3.2").unwrap_err() {
            HarnessError::ToolNotFound { version, .. } => assert_eq!(version, "1.3.2"),
            other => panic!("erreur inattendue: {other}"),
        }
    }

    #[test]
    fn bare_name_without_root_is_left_to_path_lookup() {
        let ts = DirectoryToolset::default();
        assert_eq!(ts.vb_compiler("4.8.0").unwrap(), PathBuf::from(exe_name()));
        assert_eq!(ts.vb_compiler("1.3.2").unwrap(), PathBuf::from(exe_name()));
    }

    #[test]
    fn override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("my-vbc");
        std::fs::write(&custom, "").unwrap();
        let ts = DirectoryToolset::new("/does/not/exist").with_override("4.8.0", &custom);
        assert_eq!(ts.vb_compiler("4.8.0").unwrap(), custom);
    }
}
