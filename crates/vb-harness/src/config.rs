//! Configuration du harnais.
//!
//! Couches, de la plus faible à la plus forte :
//!   1. `HarnessConfig::default()`
//!   2. fichier TOML (`HarnessConfig::from_toml_file`)
//!   3. ENV (`apply_env`)
//!   4. overrides de l’appelant (champs publics)
//!
//! ENV supportés (tous facultatifs) :
//!   VBH_TOOLSET_DIR=<dir>      racine des versions de vbc
//!   VBH_REFERENCE_DIR=<dir>    racine des profils de références
//!   VBH_NO_SHARED=0|1          désactive `/shared` (serveur de compilation)
//!   VBH_TEMP_DIR=<dir>         dossier des artefacts générés

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// `<toolset_dir>/<version>/vbc[.exe]`
    pub toolset_dir: Option<PathBuf>,
    /// Chemins explicites par version, prioritaires sur `toolset_dir`.
    pub compilers: BTreeMap<String, PathBuf>,
    /// `<reference_dir>/{framework,core,visualbasic}/*.dll`
    pub reference_dir: Option<PathBuf>,
    /// Ajoute `/shared` (réutilise le serveur VBCSCompiler).
    pub use_compiler_server: bool,
    /// Dossier des sorties générées quand l’appelant n’en fournit pas.
    pub temp_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            toolset_dir: None,
            compilers: BTreeMap::new(),
            reference_dir: None,
            use_compiler_server: true,
            temp_dir: None,
        }
    }
}

impl HarnessConfig {
    /// Défauts + ENV.
    pub fn from_env() -> Self {
        let mut c = Self::default();
        c.apply_env();
        c
    }

    pub fn from_toml_str(s: &str, origin: &Path) -> Result<Self> {
        toml::from_str(s).map_err(|e| HarnessError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).map_err(|e| HarnessError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&s, path)
    }

    /// Applique les variables `VBH_*`.
    pub fn apply_env(&mut self) {
        self.apply_vars(|k| std::env::var(k).ok());
    }

    fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("VBH_TOOLSET_DIR") { self.toolset_dir = Some(v.into()); }
        if let Some(v) = get("VBH_REFERENCE_DIR") { self.reference_dir = Some(v.into()); }
        if let Some(v) = get("VBH_TEMP_DIR") { self.temp_dir = Some(v.into()); }
        if let Some(v) = get("VBH_NO_SHARED") {
            if let Some(b) = parse_bool(&v) { self.use_compiler_server = !b; }
        }
    }

    /// Dossier effectif des artefacts générés.
    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
