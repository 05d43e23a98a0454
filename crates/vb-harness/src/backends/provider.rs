//! Chemin « provider » : compilateur VB hébergé dans le processus courant.
//!
//! Le harnais ne fournit aucune implémentation ; l’hôte enregistre la sienne
//! via `Harness::with_provider`.

use std::path::PathBuf;

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::intent::{Intent, OutputKind, Platform};
use crate::sources::SourceSet;

/// Version du compilateur demandée au provider.
pub const PROVIDER_COMPILER_VERSION: &str = "v4.0";

const BASE_ASSEMBLIES: [&str; 3] = ["System.dll", "System.Core.dll", "System.Xml.dll"];
const VISUAL_BASIC_ASSEMBLY: &str = "Microsoft.VisualBasic.dll";

/// Paramètres typés passés au compilateur in-process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOptions {
    pub compiler_version: &'static str,
    pub generate_executable: bool,
    /// Options en ligne, au format `/opt` du compilateur hébergé.
    pub compiler_options: String,
    pub output_assembly: PathBuf,
    /// Noms d’assemblages, pas des chemins.
    pub referenced_assemblies: Vec<String>,
}

impl ProviderOptions {
    pub fn from_intent(intent: &Intent, output: PathBuf) -> Self {
        let mut opts = String::from(if intent.optimize { "/optimize+" } else { "/optimize-" });
        if intent.debug_info {
            opts.push_str(" /debug");
        }
        if intent.platform == Platform::X86 {
            opts.push_str(" /platform:anycpu32bitpreferred");
        }
        opts.push_str(" /optioninfer+ /optionexplicit+");
        if !intent.defines.is_empty() {
            let defs: Vec<String> = intent.defines.iter().map(|(k, v)| format!("{k}={v}")).collect();
            opts.push_str(" /d:");
            opts.push_str(&defs.join(","));
        }

        // Le profil Core n’a pas d’équivalent ici : seule la base fixe est utilisée.
        let mut referenced_assemblies: Vec<String> =
            BASE_ASSEMBLIES.iter().map(|s| (*s).to_owned()).collect();
        if intent.references.visual_basic {
            referenced_assemblies.push(VISUAL_BASIC_ASSEMBLY.to_owned());
        }

        Self {
            compiler_version: PROVIDER_COMPILER_VERSION,
            generate_executable: intent.output_kind == OutputKind::Executable,
            compiler_options: opts,
            output_assembly: output,
            referenced_assemblies,
        }
    }
}

/// Résultat brut du provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOutput {
    /// Erreurs et avertissements, dans l’ordre d’émission.
    pub diagnostics: Vec<Diagnostic>,
    /// Assemblage réellement écrit, s’il diffère de `output_assembly`.
    pub artifact: Option<PathBuf>,
}

impl ProviderOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| !d.is_warning())
    }
}

/// Compilateur VB hébergé.
///
/// `Err` est réservé aux pannes de l’hôte ; les erreurs de compilation
/// passent par `ProviderOutput::diagnostics`.
pub trait InProcessCompiler: Send + Sync {
    fn compile(&self, sources: &SourceSet, options: &ProviderOptions) -> Result<ProviderOutput>;
}
