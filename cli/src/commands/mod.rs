pub mod compile;
pub mod completions;
pub mod plan;
pub mod sources;

use std::path::PathBuf;

use clap::{Args as ClapArgs, ValueEnum};
use color_eyre::eyre::Result;
use vb_harness::{BackendVariant, CompilerFlags, Harness, HarnessConfig};

/// Variante choisie en ligne de commande.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendArg {
    Latest,
    #[value(name = "roslyn-1.3.2")]
    Roslyn132,
    #[value(name = "roslyn-2.10.0")]
    Roslyn2100,
    Legacy,
    Mcs,
}

impl From<BackendArg> for BackendVariant {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Latest => Self::RoslynLatest,
            BackendArg::Roslyn132 => Self::Roslyn1_3_2,
            BackendArg::Roslyn2100 => Self::Roslyn2_10_0,
            BackendArg::Legacy => Self::LegacyProvider,
            BackendArg::Mcs => Self::Mcs,
        }
    }
}

/// Options de compilation partagées par `compile` et `plan`.
#[derive(ClapArgs, Debug, Default)]
pub struct FlagArgs {
    /// Backend (défaut: latest)
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,
    /// /optimize+ et symbole OPT
    #[arg(long)]
    pub optimize: bool,
    /// Symbole DEBUG (et /debug côté provider)
    #[arg(long)]
    pub debug: bool,
    /// -debug:full (Roslyn)
    #[arg(long)]
    pub pdb: bool,
    /// Produire une bibliothèque (.dll)
    #[arg(long)]
    pub library: bool,
    /// Forcer x86
    #[arg(long)]
    pub x86: bool,
    /// Profil de références « core »
    #[arg(long)]
    pub reference_core: bool,
    /// Ajouter Microsoft.VisualBasic
    #[arg(long)]
    pub reference_vb: bool,
    /// -langversion:preview (latest uniquement)
    #[arg(long)]
    pub preview: bool,
    /// Champ de bits brut, combiné avec les options ci-dessus (ex: 0x203)
    #[arg(long, value_parser = parse_bits)]
    pub flags: Option<u32>,
}

fn parse_bits(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("entier invalide `{s}`: {e}"))
}

impl FlagArgs {
    pub fn to_flags(&self) -> Result<CompilerFlags> {
        let mut f = match self.flags {
            Some(bits) => CompilerFlags::from_raw(bits)?,
            None => CompilerFlags::empty(),
        };
        if let Some(b) = self.backend {
            f |= BackendVariant::from(b).flag();
        }
        for (on, bit) in [
            (self.optimize, CompilerFlags::OPTIMIZE),
            (self.debug, CompilerFlags::USE_DEBUG),
            (self.pdb, CompilerFlags::GENERATE_PDB),
            (self.library, CompilerFlags::LIBRARY),
            (self.x86, CompilerFlags::FORCE_32_BIT),
            (self.reference_core, CompilerFlags::REFERENCE_CORE),
            (self.reference_vb, CompilerFlags::REFERENCE_VISUAL_BASIC),
            (self.preview, CompilerFlags::PREVIEW),
        ] {
            if on {
                f |= bit;
            }
        }
        Ok(f)
    }
}

/// Options globales : fichier de configuration et overrides.
#[derive(ClapArgs, Debug, Default)]
pub struct GlobalOpts {
    /// Fichier de configuration TOML (sinon défauts + VBH_*)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Racine des toolsets vbc (équiv. VBH_TOOLSET_DIR)
    #[arg(long, global = true)]
    pub toolset_dir: Option<PathBuf>,
    /// Racine des profils de références (équiv. VBH_REFERENCE_DIR)
    #[arg(long, global = true)]
    pub reference_dir: Option<PathBuf>,
    /// Ne pas passer /shared à vbc (équiv. VBH_NO_SHARED=1)
    #[arg(long, global = true)]
    pub no_shared: bool,
}

impl GlobalOpts {
    /// Défauts → fichier TOML éventuel → ENV → options de la ligne de commande.
    pub fn config(&self) -> Result<HarnessConfig> {
        let mut cfg = match &self.config {
            Some(p) => HarnessConfig::from_toml_file(p)?,
            None => HarnessConfig::default(),
        };
        cfg.apply_env();
        self.apply_overrides(&mut cfg);
        tracing::debug!(?cfg, "configuration effective");
        Ok(cfg)
    }

    /// Dernière couche : options explicites de la ligne de commande.
    fn apply_overrides(&self, cfg: &mut HarnessConfig) {
        if let Some(d) = &self.toolset_dir {
            cfg.toolset_dir = Some(d.clone());
        }
        if let Some(d) = &self.reference_dir {
            cfg.reference_dir = Some(d.clone());
        }
        if self.no_shared {
            cfg.use_compiler_server = false;
        }
    }

    pub fn harness(&self) -> Result<Harness> {
        Ok(Harness::new(self.config()?))
    }
}
