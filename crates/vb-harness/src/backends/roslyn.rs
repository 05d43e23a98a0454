use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{HarnessError, Result};
use crate::intent::{Intent, OutputKind, Platform};
use crate::process::{self, ProcessOutput};
use crate::selector::Dialect;
use crate::sources::SourceSet;
use crate::util::fs::absolutize;

/// Backend qui appelle un `vbc` Roslyn hors-process.
#[derive(Debug, Clone)]
pub struct RoslynCli {
    vbc: PathBuf,
    dialect: Dialect,
    shared: bool,
}

/// Commande prête à lancer. Consommée une fois par le runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltCommand {
    pub program: PathBuf,
    /// Arguments tels que passés à l’OS (non quotés).
    pub args: Vec<String>,
    /// Chemin absolu de l’artefact (`-out:`).
    pub output: PathBuf,
    line: String,
}

impl BuiltCommand {
    /// Rendu textuel quoté, stable octet pour octet à entrées égales.
    pub fn command_line(&self) -> &str {
        &self.line
    }

    pub fn run(&self) -> Result<ProcessOutput> {
        info!(command = %format!("\"{}\" {}", self.program.display(), self.line), "lancement de vbc");
        process::run(&self.program, &self.args)
    }
}

/// Accumule en parallèle la forme vecteur et la forme texte.
#[derive(Default)]
struct ArgWriter {
    args: Vec<String>,
    line: String,
}

impl ArgWriter {
    fn push(&mut self, raw: String, shown: String) {
        if !self.line.is_empty() {
            self.line.push(' ');
        }
        self.line.push_str(&shown);
        self.args.push(raw);
    }

    fn flag(&mut self, s: &str) {
        self.push(s.to_owned(), s.to_owned());
    }

    /// `-r:` + chemin → `-r:"chemin"`.
    fn prefixed_path(&mut self, prefix: &str, p: &Path) {
        let p = p.display();
        self.push(format!("{prefix}{p}"), format!("{prefix}\"{p}\""));
    }

    /// Argument entièrement quoté : `"…"`.
    fn quoted(&mut self, raw: String) {
        let shown = format!("\"{raw}\"");
        self.push(raw, shown);
    }
}

impl RoslynCli {
    pub fn new(vbc: impl Into<PathBuf>, dialect: Dialect, shared: bool) -> Self {
        Self { vbc: vbc.into(), dialect, shared }
    }

    /// Jeton `-langversion:` de l’`Intent`, s’il est compris par ce dialecte.
    pub fn lang_version<'a>(&self, intent: &'a Intent) -> Result<&'a str> {
        let lang = intent.language_version.as_deref().unwrap_or_default();
        if self.dialect.accepts_lang_version(lang) {
            Ok(lang)
        } else {
            Err(HarnessError::UnsupportedConfiguration(format!(
                "-langversion:{lang} non supporté par le dialecte {:?}",
                self.dialect
            )))
        }
    }

    /// Rend l’`Intent` dans le dialecte de ce `vbc`.
    pub fn build_command(
        &self,
        intent: &Intent,
        sources: &SourceSet,
        references: &[PathBuf],
        output: &Path,
    ) -> Result<BuiltCommand> {
        let lang = self.lang_version(intent)?;
        let output = absolutize(output)?;

        let mut w = ArgWriter::default();
        // `/shared` : non documenté, délègue au serveur VBCSCompiler.
        if self.shared {
            w.flag("/shared");
        }
        w.flag("-noconfig");
        w.flag("-optioninfer+");
        w.flag("-optionexplicit+");
        w.flag(&format!("-langversion:{lang}"));
        w.flag(if intent.optimize { "/optimize+" } else { "/optimize-" });
        w.flag(match intent.output_kind {
            OutputKind::Library => "-t:library",
            OutputKind::Executable => "-t:exe",
        });
        w.flag(if intent.debug_info { "-debug:full" } else { "-debug-" });
        w.flag(match intent.platform {
            Platform::X86 => "-platform:x86",
            Platform::AnyCpu => "-platform:anycpu",
        });
        for r in references {
            w.prefixed_path("-r:", r);
        }
        if !intent.defines.is_empty() {
            let mut d = String::from("-d:");
            for (i, (k, v)) in intent.defines.iter().enumerate() {
                if i > 0 {
                    d.push(',');
                }
                let _ = write!(d, "{k}={v}");
            }
            w.quoted(d);
        }
        w.prefixed_path("-out:", &output);
        for src in sources {
            w.quoted(src.display().to_string());
        }

        Ok(BuiltCommand { program: self.vbc.clone(), args: w.args, output, line: w.line })
    }
}
