use clap::Args as ClapArgs;
use color_eyre::eyre::Result;
use std::fmt::Write as _;
use std::path::PathBuf;
use vb_harness::{CompileRequest, Harness, Plan};

use super::{FlagArgs, GlobalOpts};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Fichier source racine (.vb)
    pub input: PathBuf,

    /// Artefact de sortie (sinon un chemin temporaire est affiché puis libéré)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub flags: FlagArgs,
}

pub fn exec(args: Args, global: &GlobalOpts) -> Result<()> {
    let harness = global.harness()?;
    let mut req = CompileRequest::new(&args.input, args.flags.to_flags()?);
    if let Some(out) = args.output {
        req = req.with_output(out);
    }
    print!("{}", render(&harness, &req)?);
    Ok(())
}

/// Texte du plan. Le fichier temporaire réservé par `plan` est supprimé : rien n’est compilé.
fn render(harness: &Harness, req: &CompileRequest) -> Result<String> {
    let plan = harness.plan(req)?;
    let mut text = String::new();
    match &plan {
        Plan::OutOfProcess { command, .. } => {
            writeln!(text, "\"{}\" {}", command.program.display(), command.command_line())?;
        }
        Plan::InProcess { options, sources, .. } => {
            writeln!(text, "provider {} ({})", options.compiler_version, options.compiler_options)?;
            writeln!(text, "  out: {}", options.output_assembly.display())?;
            writeln!(text, "  refs: {}", options.referenced_assemblies.join(", "))?;
            for s in sources {
                writeln!(text, "  src: {}", s.display())?;
            }
        }
    }
    if req.output.is_none() {
        std::fs::remove_file(plan.output())?;
    }
    Ok(text)
}
