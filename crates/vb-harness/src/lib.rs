//! vb-harness : compile des programmes Visual Basic de test avec un backend choisi.
//! - Traduit un champ de bits d’options en intention neutre, puis en ligne de commande `vbc`.
//! - Backends : `vbc` Roslyn hors-process (1.3.2, 2.10.0, dernière) ou compilateur hébergé in-process.
//! - Capture stdout/stderr sans interblocage ; échec ⇒ `CompilationFailed` avec le texte complet.

pub mod backends;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod flags;
pub mod intent;
pub mod outcome;
pub mod pipeline;
pub mod process;
pub mod references;
pub mod selector;
pub mod sources;
pub mod toolset;
mod util;

pub use backends::{BuiltCommand, InProcessCompiler, ProviderOptions, ProviderOutput};
pub use config::HarnessConfig;
pub use diagnostics::{Diagnostic, Severity};
pub use error::{HarnessError, Result};
pub use flags::{BackendVariant, CompilerFlags, Configuration};
pub use intent::Intent;
pub use outcome::CompileOutcome;
pub use pipeline::{CompileRequest, Harness, Plan};
pub use selector::ROSLYN_LATEST_VERSION;
pub use sources::SourceSet;
