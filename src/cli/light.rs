//! Lightweight builder-program construction.
//!
//! Wraps the toolkit's standard builder-program constructor so that every
//! program it produces has its expensive diagnostic accessors suppressed.
//! The wrapping is applied at each construction, so watch-driven rebuilds
//! are wrapped again automatically.

use crate::cli::config::ResolvedConfig;
use crate::toolkit::{Diagnostic, EmitResult, Program, ProgramFactory, Toolkit};

/// Which diagnostic categories the fast path suppresses.
///
/// Historical variants of this front-end disagreed on the exact gating; the
/// default is the most complete variant: semantic diagnostics are always
/// dropped, and global/emit diagnostics are dropped only when no standard
/// library is attached (`noLib`), where they are expected and spurious.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuppressionPolicy {
    /// Drop semantic (type-checking) diagnostics unconditionally.
    pub semantic: bool,
    /// Drop global (library-existence) diagnostics when `noLib` is set.
    pub global_without_lib: bool,
    /// Drop emit-time diagnostics when `noLib` is set. `emit_skipped` and
    /// the emitted-file list always pass through unchanged.
    pub emit_without_lib: bool,
}

impl Default for SuppressionPolicy {
    fn default() -> Self {
        SuppressionPolicy {
            semantic: true,
            global_without_lib: true,
            emit_without_lib: true,
        }
    }
}

/// Produces suppressed builder programs wherever the toolkit expects a
/// program-constructor callback (incremental watch, solution build, and
/// solution watch-build paths all take the same callback).
pub struct LightProgramFactory<'a> {
    toolkit: &'a dyn Toolkit,
    policy: SuppressionPolicy,
}

impl<'a> LightProgramFactory<'a> {
    pub fn new(toolkit: &'a dyn Toolkit) -> Self {
        LightProgramFactory {
            toolkit,
            policy: SuppressionPolicy::default(),
        }
    }

    pub fn with_policy(toolkit: &'a dyn Toolkit, policy: SuppressionPolicy) -> Self {
        LightProgramFactory { toolkit, policy }
    }

    /// Delegate to the toolkit's standard constructor and wrap the result.
    pub fn create(&self, config: &ResolvedConfig) -> Box<dyn Program> {
        let inner = self.toolkit.create_builder_program(config);
        Box::new(LightProgram {
            inner,
            no_lib: config.options.no_lib,
            policy: self.policy,
        })
    }

    /// The factory as the callback shape the toolkit consumes.
    pub fn into_callback(self) -> ProgramFactory<'a> {
        Box::new(move |config| self.create(config))
    }
}

/// Decorator forwarding all program members unchanged except the suppressed
/// diagnostic accessors.
struct LightProgram {
    inner: Box<dyn Program>,
    no_lib: bool,
    policy: SuppressionPolicy,
}

impl Program for LightProgram {
    fn syntactic_diagnostics(&self) -> Vec<Diagnostic> {
        self.inner.syntactic_diagnostics()
    }

    fn options_diagnostics(&self) -> Vec<Diagnostic> {
        self.inner.options_diagnostics()
    }

    fn config_file_parsing_diagnostics(&self) -> Vec<Diagnostic> {
        self.inner.config_file_parsing_diagnostics()
    }

    fn global_diagnostics(&self) -> Vec<Diagnostic> {
        if self.no_lib && self.policy.global_without_lib {
            return Vec::new();
        }
        self.inner.global_diagnostics()
    }

    fn semantic_diagnostics(&self) -> Vec<Diagnostic> {
        if self.policy.semantic {
            return Vec::new();
        }
        self.inner.semantic_diagnostics()
    }

    fn emit(&mut self) -> EmitResult {
        let mut result = self.inner.emit();
        if self.no_lib && self.policy.emit_without_lib {
            result.diagnostics.clear();
        }
        result
    }
}
