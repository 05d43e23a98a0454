//! Erreurs du harnais.
//!
//! Les quatre erreurs « métier » (`SourceNotFound`, `UnsupportedConfiguration`,
//! `UnknownBackend`, `CompilationFailed`) sont toujours remontées à l’appelant,
//! jamais journalisées puis avalées. Aucune n’est retentée.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::outcome::CompileOutcome;

/// `Result` du crate.
pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Fichier racine illisible ou fichier inclus introuvable.
    #[error("source introuvable: {path}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// Combinaison de drapeaux illégale (bug de l’appelant).
    #[error("configuration non supportée: {0}")]
    UnsupportedConfiguration(String),

    /// Variante absente de la table des versions.
    #[error("backend inconnu: {0}")]
    UnknownBackend(String),

    /// Sortie non nulle ou diagnostic de niveau erreur. Le texte est complet.
    #[error("échec de compilation:\n{text}")]
    CompilationFailed {
        text: String,
        outcome: Box<CompileOutcome>,
    },

    /// Pas d’exécutable `vbc` pour cette version.
    #[error("compilateur vbc {version} introuvable (cherché: {searched})")]
    ToolNotFound { version: String, searched: PathBuf },

    /// L’OS a refusé de lancer le processus.
    #[error("impossible de lancer {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration invalide ({path}): {message}")]
    Config { path: PathBuf, message: String },

    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl HarnessError {
    pub(crate) fn source_not_found(path: impl Into<PathBuf>, err: Option<io::Error>) -> Self {
        Self::SourceNotFound { path: path.into(), source: err }
    }

    /// Texte des diagnostics si c’est un échec de compilation.
    pub fn diagnostic_text(&self) -> Option<&str> {
        match self {
            Self::CompilationFailed { text, .. } => Some(text),
            _ => None,
        }
    }
}
