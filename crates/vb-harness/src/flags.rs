//! Champ de bits d’options et sa forme validée.
//!
//! `CompilerFlags` est le format d’entrée brut (un seul entier multiplexe le
//! choix du backend et les bascules indépendantes). Il n’est jamais lu bit à
//! bit ailleurs : `Configuration::from_flags` le valide une fois et produit un
//! type somme pour la variante + des champs séparés.

use std::fmt;

use bitflags::bitflags;

use crate::error::{HarnessError, Result};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CompilerFlags: u32 {
        const USE_DEBUG              = 1 << 0;
        const OPTIMIZE               = 1 << 1;
        const USE_ROSLYN_1_3_2       = 1 << 2;
        const USE_ROSLYN_2_10_0      = 1 << 3;
        const USE_ROSLYN_LATEST      = 1 << 4;
        const USE_MCS                = 1 << 5;
        const USE_LEGACY_PROVIDER    = 1 << 6;
        const LIBRARY                = 1 << 7;
        const FORCE_32_BIT           = 1 << 8;
        const GENERATE_PDB           = 1 << 9;
        const REFERENCE_CORE         = 1 << 10;
        const REFERENCE_VISUAL_BASIC = 1 << 11;
        const PREVIEW                = 1 << 12;
    }
}

impl CompilerFlags {
    /// Depuis un entier brut ; tout bit inconnu est refusé.
    pub fn from_raw(bits: u32) -> Result<Self> {
        Self::from_bits(bits).ok_or_else(|| {
            HarnessError::UnsupportedConfiguration(format!(
                "bits inconnus dans les options: {:#x}",
                bits & !Self::all().bits()
            ))
        })
    }
}

impl Default for CompilerFlags {
    fn default() -> Self {
        Self::USE_DEBUG
    }
}

/// Compilateur ciblé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendVariant {
    Roslyn1_3_2,
    Roslyn2_10_0,
    RoslynLatest,
    Mcs,
    LegacyProvider,
}

impl BackendVariant {
    pub const ALL: [Self; 5] = [
        Self::Roslyn1_3_2,
        Self::Roslyn2_10_0,
        Self::RoslynLatest,
        Self::Mcs,
        Self::LegacyProvider,
    ];

    pub fn flag(self) -> CompilerFlags {
        match self {
            Self::Roslyn1_3_2 => CompilerFlags::USE_ROSLYN_1_3_2,
            Self::Roslyn2_10_0 => CompilerFlags::USE_ROSLYN_2_10_0,
            Self::RoslynLatest => CompilerFlags::USE_ROSLYN_LATEST,
            Self::Mcs => CompilerFlags::USE_MCS,
            Self::LegacyProvider => CompilerFlags::USE_LEGACY_PROVIDER,
        }
    }

    pub fn is_roslyn(self) -> bool {
        matches!(self, Self::Roslyn1_3_2 | Self::Roslyn2_10_0 | Self::RoslynLatest)
    }
}

impl fmt::Display for BackendVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Roslyn1_3_2 => "roslyn-1.3.2",
            Self::Roslyn2_10_0 => "roslyn-2.10.0",
            Self::RoslynLatest => "latest",
            Self::Mcs => "mcs",
            Self::LegacyProvider => "legacy",
        })
    }
}

/// Forme validée des options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub variant: BackendVariant,
    pub optimize: bool,
    /// `/debug` + symbole `DEBUG` (chemin provider in-process).
    pub use_debug: bool,
    /// `-debug:full` (chemins Roslyn).
    pub generate_pdb: bool,
    pub library: bool,
    pub force_32_bit: bool,
    pub reference_core: bool,
    pub reference_visual_basic: bool,
    pub preview: bool,
}

impl Configuration {
    /// Valide le champ de bits. Sans bit de variante → Roslyn « latest ».
    pub fn from_flags(flags: CompilerFlags) -> Result<Self> {
        let requested: Vec<BackendVariant> = BackendVariant::ALL
            .into_iter()
            .filter(|v| flags.contains(v.flag()))
            .collect();
        let variant = match requested.as_slice() {
            [] => BackendVariant::RoslynLatest,
            [one] => *one,
            many => {
                let names: Vec<String> = many.iter().map(ToString::to_string).collect();
                return Err(HarnessError::UnsupportedConfiguration(format!(
                    "plusieurs backends demandés: {}",
                    names.join(", ")
                )));
            }
        };
        Ok(Self {
            variant,
            optimize: flags.contains(CompilerFlags::OPTIMIZE),
            use_debug: flags.contains(CompilerFlags::USE_DEBUG),
            generate_pdb: flags.contains(CompilerFlags::GENERATE_PDB),
            library: flags.contains(CompilerFlags::LIBRARY),
            force_32_bit: flags.contains(CompilerFlags::FORCE_32_BIT),
            reference_core: flags.contains(CompilerFlags::REFERENCE_CORE),
            reference_visual_basic: flags.contains(CompilerFlags::REFERENCE_VISUAL_BASIC),
            preview: flags.contains(CompilerFlags::PREVIEW),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_variant_means_latest() {
        let c = Configuration::from_flags(CompilerFlags::OPTIMIZE).unwrap();
        assert_eq!(c.variant, BackendVariant::RoslynLatest);
        assert!(c.optimize);
    }

    #[test]
    fn two_variants_are_rejected() {
        let f = CompilerFlags::USE_ROSLYN_1_3_2 | CompilerFlags::USE_LEGACY_PROVIDER;
        let err = Configuration::from_flags(f).unwrap_err();
        assert!(matches!(err, HarnessError::UnsupportedConfiguration(_)));
    }

    #[test]
    fn unknown_bits_are_rejected() {
        assert!(CompilerFlags::from_raw(1 << 31).is_err());
        assert_eq!(
            CompilerFlags::from_raw(0b11).unwrap(),
            CompilerFlags::USE_DEBUG | CompilerFlags::OPTIMIZE
        );
    }

    #[test]
    fn each_variant_round_trips_through_its_flag() {
        for v in BackendVariant::ALL {
            assert_eq!(Configuration::from_flags(v.flag()).unwrap().variant, v);
        }
    }
}
