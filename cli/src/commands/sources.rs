use clap::Args as ClapArgs;
use color_eyre::eyre::Result;
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Fichier source racine (.vb)
    pub input: PathBuf,
}

pub fn exec(args: &Args) -> Result<()> {
    let set = vb_harness::sources::expand(&args.input)?;
    for p in &set {
        println!("{}", p.display());
    }
    Ok(())
}
