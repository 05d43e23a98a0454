use clap::Args as ClapArgs;
use color_eyre::eyre::{bail, Result};
use std::path::PathBuf;
use vb_harness::CompileRequest;

use super::{FlagArgs, GlobalOpts};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Fichier source racine (.vb)
    pub input: PathBuf,

    /// Artefact de sortie (sinon fichier temporaire unique)
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

    let outcome = harness.try_compile(&req)?;
    if !outcome.diagnostic_text.is_empty() {
        eprint!("{}", outcome.diagnostic_text);
        if !outcome.diagnostic_text.ends_with('\n') {
            eprintln!();
        }
    }
    if !outcome.success {
        match outcome.exit_code {
            Some(code) => bail!("compilation échouée (vbc code {code})"),
            None => bail!("compilation échouée"),
        }
    }
    println!("{}", outcome.artifact().display());
    Ok(())
}
