//! Traduction `Configuration` → `Intent` (options neutres vis-à-vis du backend).
//!
//! Fonction pure : même entrée, même `Intent`, à chaque appel.

use std::collections::BTreeMap;

use crate::error::{HarnessError, Result};
use crate::flags::{BackendVariant, Configuration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Library,
    Executable,
}

impl OutputKind {
    /// Extension de l’artefact produit.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Library => "dll",
            Self::Executable => "exe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    AnyCpu,
    X86,
}

/// Profil de base des références.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceProfile {
    Default,
    Core,
    VisualBasic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSelection {
    /// `Default` ou `Core`.
    pub base: ReferenceProfile,
    /// Ajoute le profil `VisualBasic` après la base.
    pub visual_basic: bool,
}

impl ReferenceSelection {
    /// Profils à charger, dans l’ordre de rendu.
    pub fn profiles(self) -> Vec<ReferenceProfile> {
        let mut v = vec![self.base];
        if self.visual_basic {
            v.push(ReferenceProfile::VisualBasic);
        }
        v
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub variant: BackendVariant,
    pub optimize: bool,
    pub debug_info: bool,
    pub output_kind: OutputKind,
    pub platform: Platform,
    /// `None` pour les chemins sans `-langversion` (provider, mcs).
    pub language_version: Option<String>,
    pub defines: BTreeMap<String, String>,
    pub references: ReferenceSelection,
}

impl Intent {
    pub fn translate(cfg: &Configuration) -> Result<Self> {
        if cfg.preview && cfg.variant != BackendVariant::RoslynLatest {
            return Err(HarnessError::UnsupportedConfiguration(format!(
                "PREVIEW n’est disponible qu’avec la dernière version de Roslyn (demandé: {})",
                cfg.variant
            )));
        }

        let language_version = match cfg.variant {
            BackendVariant::Roslyn1_3_2 => Some("14"),
            BackendVariant::Roslyn2_10_0 => Some("latest"),
            BackendVariant::RoslynLatest if cfg.preview => Some("preview"),
            BackendVariant::RoslynLatest => Some("latest"),
            BackendVariant::Mcs | BackendVariant::LegacyProvider => None,
        };

        let debug_info = if cfg.variant.is_roslyn() { cfg.generate_pdb } else { cfg.use_debug };

        Ok(Self {
            variant: cfg.variant,
            optimize: cfg.optimize,
            debug_info,
            output_kind: if cfg.library { OutputKind::Library } else { OutputKind::Executable },
            platform: if cfg.force_32_bit { Platform::X86 } else { Platform::AnyCpu },
            language_version: language_version.map(str::to_owned),
            defines: preprocessor_symbols(cfg),
            references: ReferenceSelection {
                base: if cfg.reference_core {
                    ReferenceProfile::Core
                } else {
                    ReferenceProfile::Default
                },
                visual_basic: cfg.reference_visual_basic,
            },
        })
    }
}

fn preprocessor_symbols(cfg: &Configuration) -> BTreeMap<String, String> {
    let mut symbols: Vec<&str> = Vec::new();
    if cfg.use_debug {
        symbols.push("DEBUG");
    }
    if cfg.optimize {
        symbols.push("OPT");
    }
    match cfg.variant {
        BackendVariant::Roslyn1_3_2 => symbols.extend(["ROSLYN", "VB11", "VB14"]),
        BackendVariant::Roslyn2_10_0 => {
            symbols.extend(["ROSLYN", "ROSLYN2", "VB11", "VB14", "VB15"]);
        }
        BackendVariant::RoslynLatest => {
            symbols.extend(["ROSLYN", "ROSLYN2", "ROSLYN3", "VB11", "VB14", "VB15", "VB16"]);
        }
        BackendVariant::Mcs => symbols.push("MCS"),
        BackendVariant::LegacyProvider => symbols.push("LEGACY_VBC"),
    }
    symbols.into_iter().map(|s| (s.to_owned(), "1".to_owned())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::CompilerFlags;

    fn intent(flags: CompilerFlags) -> Result<Intent> {
        Intent::translate(&Configuration::from_flags(flags)?)
    }

    #[test]
    fn default_is_latest_with_latest_langversion() {
        let i = intent(CompilerFlags::empty()).unwrap();
        assert_eq!(i.variant, BackendVariant::RoslynLatest);
        assert_eq!(i.language_version.as_deref(), Some("latest"));
        assert_eq!(i.output_kind, OutputKind::Executable);
        assert_eq!(i.platform, Platform::AnyCpu);
        assert!(!i.debug_info);
    }

    #[test]
    fn preview_only_on_latest() {
        let i = intent(CompilerFlags::PREVIEW).unwrap();
        assert_eq!(i.language_version.as_deref(), Some("preview"));

        for v in [BackendVariant::LegacyProvider, BackendVariant::Roslyn1_3_2] {
            let err = intent(v.flag() | CompilerFlags::PREVIEW).unwrap_err();
            assert!(matches!(err, HarnessError::UnsupportedConfiguration(_)));
        }
    }

    #[test]
    fn pinned_versions_have_pinned_langversion() {
        let a = intent(CompilerFlags::USE_ROSLYN_1_3_2).unwrap();
        assert_eq!(a.language_version.as_deref(), Some("14"));
        let b = intent(CompilerFlags::USE_ROSLYN_2_10_0).unwrap();
        assert_eq!(b.language_version.as_deref(), Some("latest"));
    }

    #[test]
    fn debug_bit_depends_on_path() {
        // Roslyn : seul GENERATE_PDB compte.
        assert!(!intent(CompilerFlags::USE_DEBUG).unwrap().debug_info);
        assert!(intent(CompilerFlags::GENERATE_PDB).unwrap().debug_info);
        // Provider : USE_DEBUG.
        let legacy = CompilerFlags::USE_LEGACY_PROVIDER;
        assert!(intent(legacy | CompilerFlags::USE_DEBUG).unwrap().debug_info);
        assert!(!intent(legacy | CompilerFlags::GENERATE_PDB).unwrap().debug_info);
    }

    #[test]
    fn defines_follow_flags_and_variant() {
        let i = intent(
            CompilerFlags::USE_DEBUG | CompilerFlags::OPTIMIZE | CompilerFlags::USE_ROSLYN_1_3_2,
        )
        .unwrap();
        let keys: Vec<_> = i.defines.keys().map(String::as_str).collect();
        assert_eq!(keys, ["DEBUG", "OPT", "ROSLYN", "VB11", "VB14"]);
        assert!(i.defines.values().all(|v| v == "1"));

        let legacy = intent(CompilerFlags::USE_LEGACY_PROVIDER).unwrap();
        assert_eq!(legacy.defines.keys().collect::<Vec<_>>(), ["LEGACY_VBC"]);
    }

    #[test]
    fn references_selection() {
        let i = intent(CompilerFlags::REFERENCE_CORE | CompilerFlags::REFERENCE_VISUAL_BASIC)
            .unwrap();
        assert_eq!(
            i.references.profiles(),
            [ReferenceProfile::Core, ReferenceProfile::VisualBasic]
        );
        assert_eq!(
            intent(CompilerFlags::empty()).unwrap().references.profiles(),
            [ReferenceProfile::Default]
        );
    }

    #[test]
    fn library_and_x86() {
        let i = intent(CompilerFlags::LIBRARY | CompilerFlags::FORCE_32_BIT).unwrap();
        assert_eq!(i.output_kind, OutputKind::Library);
        assert_eq!(i.platform, Platform::X86);
        assert_eq!(i.output_kind.extension(), "dll");
    }
}
