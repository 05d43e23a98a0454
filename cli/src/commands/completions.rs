use clap::{Args as ClapArgs, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Shell cible
    #[arg(long, value_enum)]
    pub shell: Shell,
    /// Dossier de sortie (stdout si omis)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub fn exec(args: Args) -> color_eyre::Result<()> {
    let mut cmd = crate::Cli::command();

    let mut writer: Box<dyn io::Write> = if let Some(dir) = args.out_dir {
        std::fs::create_dir_all(&dir)?;
        Box::new(std::fs::File::create(dir.join(completion_file(args.shell)))?)
    } else {
        Box::new(io::stdout())
    };

    generate(args.shell, &mut cmd, "vbh", &mut writer);
    Ok(())
}

/// Nom de fichier conventionnel par shell.
fn completion_file(shell: Shell) -> &'static str {
    match shell {
        Shell::Zsh => "_vbh",
        Shell::Fish => "vbh.fish",
        Shell::PowerShell => "_vbh.ps1",
        Shell::Elvish => "vbh.elv",
        _ => "vbh.bash",
    }
}
