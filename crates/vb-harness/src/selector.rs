//! Table des versions : variante → backend concret.

use std::fmt;

use crate::error::{HarnessError, Result};
use crate::flags::BackendVariant;

/// Version du paquet Roslyn utilisée pour la variante « latest ».
pub const ROSLYN_LATEST_VERSION: &str = "4.8.0";

/// Dialecte de ligne de commande d’une génération de `vbc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Roslyn 1.x : `-langversion` numérique uniquement.
    Roslyn1,
    /// Roslyn 2.x : accepte `latest`.
    Roslyn2,
    /// Roslyn 3.x et plus : accepte `latest` et `preview`.
    Roslyn3,
}

impl Dialect {
    /// Le jeton `-langversion:` est-il compris par ce dialecte ?
    pub fn accepts_lang_version(self, token: &str) -> bool {
        match token {
            "latest" => self != Self::Roslyn1,
            "preview" => self == Self::Roslyn3,
            other => !other.is_empty() && other.chars().all(|c| c.is_ascii_digit() || c == '.'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    OutOfProcess { version: &'static str, dialect: Dialect },
    InProcess,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfProcess { version, .. } => write!(f, "vbc {version}"),
            Self::InProcess => f.write_str("provider in-process"),
        }
    }
}

/// Résout la variante. `Mcs` n’a pas de compilateur VB : `UnknownBackend`.
pub fn select(variant: BackendVariant) -> Result<Backend> {
    match variant {
        BackendVariant::Roslyn1_3_2 => {
            Ok(Backend::OutOfProcess { version: "1.3.2", dialect: Dialect::Roslyn1 })
        }
        BackendVariant::Roslyn2_10_0 => {
            Ok(Backend::OutOfProcess { version: "2.10.0", dialect: Dialect::Roslyn2 })
        }
        BackendVariant::RoslynLatest => {
            Ok(Backend::OutOfProcess { version: ROSLYN_LATEST_VERSION, dialect: Dialect::Roslyn3 })
        }
        BackendVariant::LegacyProvider => Ok(Backend::InProcess),
        BackendVariant::Mcs => {
            Err(HarnessError::UnknownBackend(format!("{variant}: pas de compilateur VB pour mcs")))
        }
    }
}
