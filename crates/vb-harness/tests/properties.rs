use std::path::PathBuf;

use proptest::prelude::*;
use vb_harness::backends::RoslynCli;
use vb_harness::selector::{self, Backend};
use vb_harness::{CompilerFlags, Configuration, HarnessError, Intent};

fn any_flags() -> impl Strategy<Value = CompilerFlags> {
    (0u32..=CompilerFlags::all().bits()).prop_map(CompilerFlags::from_bits_truncate)
}

proptest! {
    /// Toute combinaison donne un `Intent` ou une erreur de configuration, jamais autre chose.
    #[test]
    fn translation_is_total_and_deterministic(flags in any_flags()) {
        let first = Configuration::from_flags(flags).and_then(|c| Intent::translate(&c));
        let second = Configuration::from_flags(flags).and_then(|c| Intent::translate(&c));
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(HarnessError::UnsupportedConfiguration(a)), Err(HarnessError::UnsupportedConfiguration(b))) => {
                prop_assert_eq!(a, b);
            }
            (a, b) => prop_assert!(false, "résultats divergents: {:?} / {:?}", a, b),
        }
    }

    #[test]
    fn command_text_is_byte_stable(flags in any_flags()) {
        let Ok(intent) = Configuration::from_flags(flags).and_then(|c| Intent::translate(&c)) else {
            return Ok(());
        };
        let Ok(Backend::OutOfProcess { dialect, .. }) = selector::select(intent.variant) else {
            return Ok(());
        };
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Main.vb");
        std::fs::write(&root, "Module M\nEnd Module\n").unwrap();
        let sources = vb_harness::sources::expand(&root).unwrap();
        let refs = [PathBuf::from("/refs/a.dll")];
        let out = dir.path().join("a.out");

        let cli = RoslynCli::new("vbc", dialect, true);
        let a = cli.build_command(&intent, &sources, &refs, &out).unwrap();
        let b = cli.build_command(&intent, &sources, &refs, &out).unwrap();
        prop_assert_eq!(a.command_line().as_bytes(), b.command_line().as_bytes());
        prop_assert_eq!(a.args.len(), b.args.len());
        // `-d:` absent ⇔ aucun symbole.
        prop_assert_eq!(intent.defines.is_empty(), !a.command_line().contains("\"-d:"));
    }

    #[test]
    fn at_most_one_variant(flags in any_flags()) {
        let variants = [
            CompilerFlags::USE_ROSLYN_1_3_2,
            CompilerFlags::USE_ROSLYN_2_10_0,
            CompilerFlags::USE_ROSLYN_LATEST,
            CompilerFlags::USE_MCS,
            CompilerFlags::USE_LEGACY_PROVIDER,
        ];
        let requested = variants.iter().filter(|v| flags.contains(**v)).count();
        let cfg = Configuration::from_flags(flags);
        prop_assert_eq!(requested <= 1, cfg.is_ok());
    }
}

#[test]
fn unknown_bits_are_rejected() {
    let bogus = CompilerFlags::all().bits() + 1;
    assert!(matches!(CompilerFlags::from_raw(bogus), Err(HarnessError::UnsupportedConfiguration(_))));
}
