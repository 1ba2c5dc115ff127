//! Compilation mode and emit fidelity selection.

use crate::cli::config::{ResolvedOptions, forces_full_checking};

/// The four mutually exclusive execution strategies. Derived from the
/// resolved options on every invocation, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationMode {
    Compile,
    WatchCompile,
    Build,
    WatchBuild,
}

impl CompilationMode {
    /// Total over all flag combinations: `build` selects the build family,
    /// `watch` splits each family. No other option participates.
    pub fn select(options: &ResolvedOptions) -> Self {
        match (options.build, options.watch) {
            (true, true) => CompilationMode::WatchBuild,
            (true, false) => CompilationMode::Build,
            (false, true) => CompilationMode::WatchCompile,
            (false, false) => CompilationMode::Compile,
        }
    }
}

/// Whether emitted output is checked against full library-aware semantics or
/// produced on the fast, unchecked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitFidelity {
    Full,
    Light,
}

impl EmitFidelity {
    pub fn of(options: &ResolvedOptions) -> Self {
        if forces_full_checking(options) {
            EmitFidelity::Full
        } else {
            EmitFidelity::Light
        }
    }
}
