//! Lancement d’un compilateur externe et capture de stdout/stderr.
//!
//! Les deux flux sont vidés par deux threads en parallèle l’un de l’autre et
//! de `wait()`. Un flux lu jusqu’au bout avant l’autre peut remplir le tampon
//! du pipe restant et bloquer l’enfant indéfiniment.
//!
//! Pas de timeout ni d’annulation : un enfant bloqué bloque l’appelant.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::error::{HarnessError, Result};

/// Code de sortie + textes capturés.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` si l’enfant a été tué par un signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Lance `program args…` sans shell et attend la fin de l’enfant **et** des deux flux.
pub fn run(program: &Path, args: &[String]) -> Result<ProcessOutput> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| HarnessError::Spawn { program: program.to_path_buf(), source })?;

    let stdout = child.stdout.take().ok_or_else(|| io::Error::other("stdout non redirigé"))?;
    let stderr = child.stderr.take().ok_or_else(|| io::Error::other("stderr non redirigé"))?;

    let (status, out, err) = thread::scope(|s| {
        let out = s.spawn(move || drain(stdout));
        let err = s.spawn(move || drain(stderr));
        let status = child.wait();
        (status, join(out), join(err))
    });

    let status = status?;
    let output = ProcessOutput { exit_code: status.code(), stdout: out?, stderr: err? };
    debug!(exit = ?output.exit_code, stdout = %output.stdout, stderr = %output.stderr, "processus terminé");
    Ok(output)
}

fn drain(mut r: impl Read) -> io::Result<String> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join(h: thread::ScopedJoinHandle<'_, io::Result<String>>) -> io::Result<String> {
    h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}
