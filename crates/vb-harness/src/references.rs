//! Listes de références par profil, calculées une fois puis partagées.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::{HarnessError, Result};
use crate::intent::{ReferenceProfile, ReferenceSelection};

/// « Donne-moi les chemins de références du profil X ».
pub trait ReferenceResolver: Send + Sync {
    fn resolve(&self, profile: ReferenceProfile) -> Result<Vec<PathBuf>>;
}

/// `*.dll` de `<root>/{framework,core,visualbasic}`, triés par nom.
///
/// Sans racine, chaque profil est vide.
#[derive(Debug, Clone, Default)]
pub struct DirectoryReferences {
    root: Option<PathBuf>,
}

impl DirectoryReferences {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn subdir(profile: ReferenceProfile) -> &'static str {
        match profile {
            ReferenceProfile::Default => "framework",
            ReferenceProfile::Core => "core",
            ReferenceProfile::VisualBasic => "visualbasic",
        }
    }
}

impl ReferenceResolver for DirectoryReferences {
    fn resolve(&self, profile: ReferenceProfile) -> Result<Vec<PathBuf>> {
        let Some(root) = &self.root else { return Ok(Vec::new()) };
        let dir = root.join(Self::subdir(profile));
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if is_assembly(&path) {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }
}

fn is_assembly(p: &Path) -> bool {
    p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("dll"))
}

/// Cache lecture seule : un `OnceCell` par profil.
///
/// Le premier accès concurrent calcule une seule fois ; ensuite plus aucune
/// écriture. Une erreur de résolution n’est pas mémorisée.
pub struct ReferenceCache {
    resolver: Box<dyn ReferenceResolver>,
    default: OnceCell<Arc<[PathBuf]>>,
    core: OnceCell<Arc<[PathBuf]>>,
    visual_basic: OnceCell<Arc<[PathBuf]>>,
}

impl ReferenceCache {
    pub fn new(resolver: impl ReferenceResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            default: OnceCell::new(),
            core: OnceCell::new(),
            visual_basic: OnceCell::new(),
        }
    }

    pub fn get(&self, profile: ReferenceProfile) -> Result<Arc<[PathBuf]>> {
        let cell = match profile {
            ReferenceProfile::Default => &self.default,
            ReferenceProfile::Core => &self.core,
            ReferenceProfile::VisualBasic => &self.visual_basic,
        };
        cell.get_or_try_init(|| {
            let paths = self.resolver.resolve(profile)?;
            debug!(?profile, count = paths.len(), "références résolues");
            Ok::<_, HarnessError>(Arc::from(paths))
        })
        .cloned()
    }

    /// Base puis extras, dans l’ordre de `ReferenceSelection::profiles`.
    pub fn for_selection(&self, sel: ReferenceSelection) -> Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for profile in sel.profiles() {
            out.extend(self.get(profile)?.iter().cloned());
        }
        Ok(out)
    }
}

impl std::fmt::Debug for ReferenceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceCache")
            .field("default", &self.default.get())
            .field("core", &self.core.get())
            .field("visual_basic", &self.visual_basic.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    impl ReferenceResolver for Counting {
        fn resolve(&self, profile: ReferenceProfile) -> Result<Vec<PathBuf>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec![PathBuf::from(format!("{profile:?}.dll"))])
        }
    }

    #[test]
    fn memoized_once_even_under_concurrency() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ReferenceCache::new(Counting(calls.clone()));
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| cache.get(ReferenceProfile::Core).unwrap());
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(&*cache.get(ReferenceProfile::Core).unwrap(), [PathBuf::from("Core.dll")]);
    }

    #[test]
    fn selection_concatenates_base_then_vb() {
        let cache = ReferenceCache::new(Counting(Arc::new(AtomicUsize::new(0))));
        let sel = ReferenceSelection { base: ReferenceProfile::Default, visual_basic: true };
        assert_eq!(
            cache.for_selection(sel).unwrap(),
            [PathBuf::from("Default.dll"), PathBuf::from("VisualBasic.dll")]
        );
    }

    #[test]
    fn directory_listing_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let fw = dir.path().join("framework");
        fs::create_dir_all(&fw).unwrap();
        for name in ["System.Xml.dll", "mscorlib.dll", "System.dll", "notes.txt"] {
            fs::write(fw.join(name), "").unwrap();
        }
        let refs = DirectoryReferences::new(Some(dir.path().to_path_buf()));
        let got = refs.resolve(ReferenceProfile::Default).unwrap();
        let names: Vec<_> = got.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
        assert_eq!(names, ["System.Xml.dll", "System.dll", "mscorlib.dll"]);
        assert!(refs.resolve(ReferenceProfile::Core).unwrap().is_empty());
    }
}
