//! Orchestration : requête → sources → options → backend → exécution → résultat.
//!
//! Étapes, dans l’ordre (chaque erreur arrête tout, rien n’est retenté) :
//!   1. expansion des sources
//!   2. validation des drapeaux + traduction en `Intent`
//!   3. sélection du backend
//!   4. chemin de sortie (explicite ou fichier temporaire réservé)
//!   5. compilateur + références, puis construction de la commande
//!   6. exécution et normalisation
//!
//! Une `Harness` est partageable entre threads (`&Harness`) : la seule donnée
//! mutable est le cache de références, écrit une fois par profil.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::backends::{BuiltCommand, InProcessCompiler, ProviderOptions, RoslynCli};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::flags::{CompilerFlags, Configuration};
use crate::intent::Intent;
use crate::outcome::CompileOutcome;
use crate::references::{DirectoryReferences, ReferenceCache, ReferenceResolver};
use crate::selector::{self, Backend};
use crate::sources::{self, SourceSet};
use crate::toolset::{CompilerToolset, DirectoryToolset};
use crate::util::fs::{absolutize, ensure_parent, tmp_output};

/// Préfixe des artefacts générés.
const TMP_PREFIX: &str = "vbh-";

/// Une demande de compilation, possédée par l’appelant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub root_source: PathBuf,
    pub output: Option<PathBuf>,
    pub flags: CompilerFlags,
}

impl CompileRequest {
    pub fn new(root_source: impl Into<PathBuf>, flags: CompilerFlags) -> Self {
        Self { root_source: root_source.into(), output: None, flags }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Tout ce qui sera exécuté, calculé sans rien lancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    OutOfProcess { intent: Intent, sources: SourceSet, command: BuiltCommand },
    InProcess { intent: Intent, sources: SourceSet, options: ProviderOptions },
}

impl Plan {
    pub fn intent(&self) -> &Intent {
        match self {
            Self::OutOfProcess { intent, .. } | Self::InProcess { intent, .. } => intent,
        }
    }

    pub fn sources(&self) -> &SourceSet {
        match self {
            Self::OutOfProcess { sources, .. } | Self::InProcess { sources, .. } => sources,
        }
    }

    pub fn output(&self) -> &Path {
        match self {
            Self::OutOfProcess { command, .. } => &command.output,
            Self::InProcess { options, .. } => &options.output_assembly,
        }
    }
}

pub struct Harness {
    config: HarnessConfig,
    toolset: Box<dyn CompilerToolset>,
    references: ReferenceCache,
    provider: Option<Box<dyn InProcessCompiler>>,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        let toolset = DirectoryToolset::from_config(&config);
        let references = ReferenceCache::new(DirectoryReferences::new(config.reference_dir.clone()));
        Self { config, toolset: Box::new(toolset), references, provider: None }
    }

    pub fn with_toolset(mut self, toolset: impl CompilerToolset + 'static) -> Self {
        self.toolset = Box::new(toolset);
        self
    }

    /// Remplace le résolveur ; le cache repart vide.
    pub fn with_references(mut self, resolver: impl ReferenceResolver + 'static) -> Self {
        self.references = ReferenceCache::new(resolver);
        self
    }

    pub fn with_provider(mut self, provider: impl InProcessCompiler + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn plan(&self, req: &CompileRequest) -> Result<Plan> {
        let sources = sources::expand(&req.root_source)?;
        let cfg = Configuration::from_flags(req.flags)?;
        let intent = Intent::translate(&cfg)?;
        let backend = selector::select(cfg.variant)?;
        debug!(variant = %cfg.variant, %backend, "backend sélectionné");

        match backend {
            Backend::OutOfProcess { version, dialect } => {
                let vbc = self.toolset.vb_compiler(version)?;
                let refs = self.references.for_selection(intent.references)?;
                let cli = RoslynCli::new(vbc, dialect, self.config.use_compiler_server);
                cli.lang_version(&intent)?;
                // Dernière étape faillible avant la réservation : la sortie est créée ici.
                let output = self.output_path(req, &intent)?;
                let command = match cli.build_command(&intent, &sources, &refs, &output) {
                    Ok(c) => c,
                    Err(e) => {
                        self.release_output(req, &output);
                        return Err(e);
                    }
                };
                Ok(Plan::OutOfProcess { intent, sources, command })
            }
            Backend::InProcess => {
                if self.provider.is_none() {
                    return Err(HarnessError::UnknownBackend(format!(
                        "{}: aucun compilateur in-process enregistré",
                        cfg.variant
                    )));
                }
                let output = self.output_path(req, &intent)?;
                let options = ProviderOptions::from_intent(&intent, output);
                Ok(Plan::InProcess { intent, sources, options })
            }
        }
    }

    /// Exécute et renvoie le résultat typé, succès ou échec.
    pub fn try_compile(&self, req: &CompileRequest) -> Result<CompileOutcome> {
        let outcome = match self.plan(req)? {
            Plan::OutOfProcess { command, .. } => {
                let out = command.run()?;
                CompileOutcome::from_process(out, command.output)
            }
            Plan::InProcess { sources, options, .. } => {
                let Some(provider) = &self.provider else {
                    return Err(HarnessError::UnknownBackend("provider in-process absent".into()));
                };
                info!(output = %options.output_assembly.display(), options = %options.compiler_options, "compilation in-process");
                let out = provider.compile(&sources, &options)?;
                CompileOutcome::from_provider(out, options.output_assembly)
            }
        };
        if outcome.success {
            info!(artifact = %outcome.artifact_path.display(), "compilation réussie");
        } else {
            warn!(artifact = %outcome.artifact_path.display(), "compilation échouée");
        }
        Ok(outcome)
    }

    /// Comme `try_compile`, mais un échec devient `CompilationFailed`.
    pub fn compile(&self, req: &CompileRequest) -> Result<CompileOutcome> {
        self.try_compile(req)?.into_result()
    }

    fn output_path(&self, req: &CompileRequest, intent: &Intent) -> Result<PathBuf> {
        let path = match &req.output {
            Some(p) => {
                let abs = absolutize(p)?;
                ensure_parent(&abs)?;
                abs
            }
            None => tmp_output(&self.config.output_dir(), TMP_PREFIX, intent.output_kind.extension())?,
        };
        Ok(path)
    }

    /// Supprime un fichier temporaire réservé pour un plan abandonné.
    fn release_output(&self, req: &CompileRequest, output: &Path) {
        if req.output.is_none() {
            if let Err(e) = std::fs::remove_file(output) {
                warn!(path = %output.display(), error = %e, "fichier temporaire non supprimé");
            }
        }
    }
}

impl Default for Harness {
    /// Défauts + variables d’environnement.
    fn default() -> Self {
        Self::new(HarnessConfig::from_env())
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("config", &self.config)
            .field("references", &self.references)
            .field("provider", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}
