//! Backends concrets : `vbc` hors-process et provider in-process.

pub mod provider;
pub mod roslyn;

pub use provider::{InProcessCompiler, ProviderOptions, ProviderOutput};
pub use roslyn::{BuiltCommand, RoslynCli};
