use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod commands;

#[derive(Parser)]
#[command(name = "vbh", version, about = "Harnais de compilation VB (Roslyn vbc / provider in-process)", long_about = None)]
pub struct Cli {
    /// Verbosité (répéter pour plus de bruit)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    global: commands::GlobalOpts,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compiler un programme VB et afficher l’artefact
    Compile(commands::compile::Args),

    /// Afficher la commande exacte sans rien lancer
    Plan(commands::plan::Args),

    /// Lister les sources après expansion des #include
    Sources(commands::sources::Args),

    /// Générer autocomplétions shell
    Completions(commands::completions::Args),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "vb_harness=info",
        1 => "vb_harness=debug",
        _ => "vb_harness=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Compile(a)     => commands::compile::exec(a, &cli.global),
        Cmd::Plan(a)        => commands::plan::exec(a, &cli.global),
        Cmd::Sources(a)     => commands::sources::exec(&a),
        Cmd::Completions(a) => commands::completions::exec(a),
    }
}
