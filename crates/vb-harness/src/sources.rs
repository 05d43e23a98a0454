//! Expansion des sources : fichier racine + fichiers `#include "…"`.
//!
//! Un seul niveau : les fichiers inclus ne sont **pas** rescannés.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{HarnessError, Result};
use crate::util::fs::absolutize;

static INCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"#include "([\w./]+)""#).expect("regex #include valide"));

/// Liste ordonnée de chemins absolus, racine en tête.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    paths: Vec<PathBuf>,
}

impl SourceSet {
    pub fn root(&self) -> &Path {
        &self.paths[0]
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }
}

impl<'a> IntoIterator for &'a SourceSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Lit `root`, ajoute chaque `#include "rel"` résolu depuis le dossier de `root`.
pub fn expand(root: &Path) -> Result<SourceSet> {
    let root = absolutize(root)?;
    let text = fs::read_to_string(&root)
        .map_err(|e| HarnessError::source_not_found(&root, Some(e)))?;
    let dir = root.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut paths = vec![root.clone()];
    for cap in INCLUDE.captures_iter(&text) {
        let included = absolutize(&dir.join(&cap[1]))?;
        if !included.is_file() {
            return Err(HarnessError::source_not_found(included, None));
        }
        paths.push(included);
    }
    debug!(root = %root.display(), count = paths.len(), "sources expansées");
    Ok(SourceSet { paths })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn include_of_sibling_gives_two_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Main.vb");
        fs::write(
            &root,
            indoc! {r#"
                #include "Helper.vb"
                Module Program
                    Sub Main()
                    End Sub
                End Module
            "#},
        )
        .unwrap();
        fs::write(dir.path().join("Helper.vb"), "Module Helper\nEnd Module\n").unwrap();

        let set = expand(&root).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.root(), absolutize(&root).unwrap());
        assert!(set.paths()[1].ends_with("Helper.vb"));
        assert!(set.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn includes_are_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("A.vb"), "#include \"sub/B.vb\"\n").unwrap();
        fs::write(dir.path().join("sub/B.vb"), "#include \"C.vb\"\n").unwrap();

        let set = expand(&dir.path().join("A.vb")).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.paths()[1].ends_with("sub/B.vb"));
    }

    #[test]
    fn scan_order_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Z.vb"), "").unwrap();
        fs::write(dir.path().join("A.vb"), "").unwrap();
        fs::write(dir.path().join("Root.vb"), "#include \"Z.vb\"\n#include \"A.vb\"\n").unwrap();

        let set = expand(&dir.path().join("Root.vb")).unwrap();
        let names: Vec<_> = set.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, ["Root.vb", "Z.vb", "A.vb"]);
    }

    #[test]
    fn missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = expand(&dir.path().join("Nope.vb")).unwrap_err();
        assert!(matches!(err, HarnessError::SourceNotFound { .. }));
    }

    #[test]
    fn missing_include_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Root.vb"), "#include \"Gone.vb\"\n").unwrap();
        match expand(&dir.path().join("Root.vb")).unwrap_err() {
            HarnessError::SourceNotFound { path, .. } => assert!(path.ends_with("Gone.vb")),
            other => panic!("erreur inattendue: {other}"),
        }
    }
}
