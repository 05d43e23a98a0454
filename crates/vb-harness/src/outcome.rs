//! Résultat unifié des deux chemins d’exécution.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::backends::ProviderOutput;
use crate::diagnostics::Diagnostic;
use crate::error::{HarnessError, Result};
use crate::process::ProcessOutput;

/// En-tête du texte de diagnostics quand le provider échoue.
pub const PROVIDER_ERROR_HEADER: &str = "Compiler error:";

/// Chemin qui a produit le résultat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    OutOfProcess,
    InProcess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    pub origin: Origin,
    pub success: bool,
    pub artifact_path: PathBuf,
    /// Texte complet, jamais tronqué. Peut contenir des avertissements même en cas de succès.
    pub diagnostic_text: String,
    /// Diagnostics structurés (chemin in-process uniquement).
    pub diagnostics: Vec<Diagnostic>,
    /// `None` côté in-process, ou enfant tué par un signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CompileOutcome {
    /// Succès ⇔ code de sortie 0. Texte = stdout puis stderr.
    pub fn from_process(out: ProcessOutput, artifact: PathBuf) -> Self {
        let mut text = out.stdout.clone();
        if !text.is_empty() && !text.ends_with('\n') && !out.stderr.is_empty() {
            text.push('\n');
        }
        text.push_str(&out.stderr);
        Self {
            origin: Origin::OutOfProcess,
            success: out.success(),
            artifact_path: artifact,
            diagnostic_text: text,
            diagnostics: Vec::new(),
            exit_code: out.exit_code,
            stdout: out.stdout,
            stderr: out.stderr,
        }
    }

    /// Succès ⇔ aucun diagnostic de niveau erreur.
    pub fn from_provider(out: ProviderOutput, requested: PathBuf) -> Self {
        let success = !out.has_errors();
        let mut text = String::new();
        if !success {
            text.push_str(PROVIDER_ERROR_HEADER);
            text.push('\n');
        }
        for d in &out.diagnostics {
            let _ = writeln!(text, "{d}");
        }
        Self {
            origin: Origin::InProcess,
            success,
            artifact_path: out.artifact.unwrap_or(requested),
            diagnostic_text: text,
            diagnostics: out.diagnostics,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact_path
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Échec → `CompilationFailed` avec le texte intégral.
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let mut text = match (self.origin, self.exit_code) {
            (Origin::OutOfProcess, Some(code)) => format!("vbc a échoué (code {code})\n"),
            (Origin::OutOfProcess, None) => "vbc a été interrompu\n".to_owned(),
            (Origin::InProcess, _) => String::new(),
        };
        text.push_str(&self.diagnostic_text);
        Err(HarnessError::CompilationFailed { text, outcome: Box::new(self) })
    }
}
