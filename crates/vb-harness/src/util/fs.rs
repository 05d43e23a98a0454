use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

pub fn ensure_parent(p: &Path) -> io::Result<()> {
    if let Some(dir) = p.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

/// Chemin absolu, normalisé lexicalement (`.` et `..` retirés), sans toucher au disque.
pub fn absolutize(p: &Path) -> io::Result<PathBuf> {
    let joined = if p.is_absolute() { p.to_path_buf() } else { env::current_dir()?.join(p) };
    let mut out = PathBuf::new();
    for c in joined.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// Réserve un fichier temporaire unique et le conserve sur disque.
///
/// Deux appels concurrents n’obtiennent jamais le même chemin.
pub fn tmp_output(dir: &Path, prefix: &str, ext: &str) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let suffix = format!(".{}", ext.trim_start_matches('.'));
    let file = tempfile::Builder::new().prefix(prefix).suffix(&suffix).tempfile_in(dir)?;
    file.into_temp_path().keep().map_err(|e| e.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_drops_dot_segments() {
        let base = if cfg!(windows) { PathBuf::from(r"C:\a\b") } else { PathBuf::from("/a/b") };
        let p = absolutize(&base.join("./c/../d.vb")).unwrap();
        assert_eq!(p, base.join("d.vb"));
    }

    #[test]
    fn tmp_outputs_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let a = tmp_output(dir.path(), "vbh-", "dll").unwrap();
        let b = tmp_output(dir.path(), "vbh-", ".dll").unwrap();
        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("dll"));
    }
}
