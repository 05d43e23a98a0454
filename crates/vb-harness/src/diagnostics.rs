use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity { Error, Warning }

/// Message émis par un compilateur in-process. Le texte reste opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Diagnostic {
    pub fn error(msg: impl Into<String>) -> Self {
        Self { severity: Severity::Error, code: None, message: msg.into(), file: None, line: None, column: None }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, ..Self::error(msg) }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self { self.code = Some(code.into()); self }

    pub fn at(mut self, file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn is_warning(&self) -> bool { self.severity == Severity::Warning }
}

/// Forme `fichier(ligne,col) : error BC30035: message`.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}", file.display())?;
            if let (Some(l), Some(c)) = (self.line, self.column) {
                write!(f, "({l},{c})")?;
            }
            f.write_str(" : ")?;
        }
        f.write_str(match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })?;
        if let Some(code) = &self.code {
            write!(f, " {code}")?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_like_a_compiler_line() {
        let d = Diagnostic::error("Syntax error.").with_code("BC30035").at("/src/A.vb", 3, 5);
        assert_eq!(d.to_string(), "/src/A.vb(3,5) : error BC30035: Syntax error.");
        assert_eq!(Diagnostic::warning("unused").to_string(), "warning: unused");
    }
}
