//! Capability seam between this front-end and the compiler toolkit it drives.
//!
//! The toolkit (scanner/parser/binder/checker/emitter) is an external
//! collaborator: this crate only orchestrates the construction of its hosts
//! and programs and consumes the diagnostics they surface. Everything the
//! driver needs from the toolkit or from the process environment is expressed
//! as a trait here so embedders plug in the real implementation and tests
//! substitute deterministic fakes.

use std::path::{Path, PathBuf};

use crate::cli::config::{ResolvedConfig, ResolvedOptions};

/// Severity of a toolkit-produced diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
    Message,
}

/// A single diagnostic. Produced by the toolkit; this crate only constructs
/// the configuration-parse diagnostics it forwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
    /// Empty when the diagnostic has no source location.
    pub file: String,
    pub start: u32,
    pub length: u32,
}

impl Diagnostic {
    /// A file-less error diagnostic.
    pub fn error(code: u32, message_text: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code,
            message_text: message_text.into(),
            file: String::new(),
            start: 0,
            length: 0,
        }
    }
}

/// Outcome of asking a program to emit its output files.
#[derive(Debug, Clone, Default)]
pub struct EmitResult {
    pub emit_skipped: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub emitted_files: Vec<PathBuf>,
}

/// Process-environment capabilities used by configuration resolution and
/// diagnostics reporting. Injected rather than read from ambient globals so
/// tests can pin the working directory, the error stream, and TTY detection.
pub trait System {
    fn current_directory(&self) -> PathBuf;
    fn file_exists(&self, path: &Path) -> bool;
    fn read_file(&self, path: &Path) -> Option<String>;
    /// Write already-formatted text to the error stream.
    fn write_error(&self, text: &str);
    /// Whether the error stream is attached to an interactive terminal.
    fn is_output_interactive(&self) -> bool;
}

/// The process-backed [`System`].
pub struct RealSystem;

impl System for RealSystem {
    fn current_directory(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    #[allow(clippy::print_stderr)]
    fn write_error(&self, text: &str) {
        eprint!("{text}");
    }

    fn is_output_interactive(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// Host handle owned by the toolkit. The driver only needs the pieces the
/// diagnostics reporter consumes.
pub trait CompilerHost {
    fn canonical_file_name(&self, path: &Path) -> PathBuf;
    fn current_directory(&self) -> PathBuf;
    fn new_line(&self) -> &str;
}

/// Program handle owned by the toolkit. Covers both plain programs and
/// incremental builder programs; the driver treats them uniformly.
///
/// `config_file_parsing_diagnostics` echoes the `errors` carried by the
/// [`ResolvedConfig`] the program was constructed from.
pub trait Program {
    fn syntactic_diagnostics(&self) -> Vec<Diagnostic>;
    fn options_diagnostics(&self) -> Vec<Diagnostic>;
    fn config_file_parsing_diagnostics(&self) -> Vec<Diagnostic>;
    fn global_diagnostics(&self) -> Vec<Diagnostic>;
    fn semantic_diagnostics(&self) -> Vec<Diagnostic>;
    fn emit(&mut self) -> EmitResult;
}

/// Constructor callback the toolkit invokes whenever it needs a (re)built
/// program — on the initial build and again on every watched-file change.
pub type ProgramFactory<'a> = Box<dyn Fn(&ResolvedConfig) -> Box<dyn Program> + 'a>;

/// Loader callback resolving a member project's configuration file through
/// this crate's configuration resolution, so the invariant overrides apply
/// to every project the solution builder visits.
pub type ConfigLoader<'a> = Box<dyn Fn(&Path) -> Option<ResolvedConfig> + 'a>;

/// Handoff payload for the watch-compile strategy. Registering it hands
/// control permanently to the toolkit's event loop.
pub struct WatchRequest<'a> {
    pub config_path: Option<&'a Path>,
    pub config: &'a ResolvedConfig,
    pub create_program: ProgramFactory<'a>,
}

/// Handoff payload for the project-reference build strategies.
pub struct SolutionRequest<'a> {
    pub root_config: &'a Path,
    pub incremental: bool,
    /// When set the builder keeps watching after the initial build and does
    /// not return under normal operation.
    pub watch: bool,
    pub create_program: ProgramFactory<'a>,
    pub load_config: ConfigLoader<'a>,
}

/// The compiler toolkit's program/host construction surface.
pub trait Toolkit {
    /// Construct a host appropriate for the resolved options (an
    /// incremental-state-aware host when `incremental` is set).
    fn create_host(&self, options: &ResolvedOptions) -> Box<dyn CompilerHost>;

    fn create_program(
        &self,
        config: &ResolvedConfig,
        host: &dyn CompilerHost,
    ) -> Box<dyn Program>;

    fn create_incremental_program(
        &self,
        config: &ResolvedConfig,
        host: &dyn CompilerHost,
    ) -> Box<dyn Program>;

    /// The standard incremental builder-program constructor. The light
    /// program factory wraps every program this returns.
    fn create_builder_program(&self, config: &ResolvedConfig) -> Box<dyn Program>;

    /// Register a watch host and enter the toolkit's event loop. Does not
    /// return under normal operation.
    fn watch_compile(&self, request: WatchRequest<'_>) -> anyhow::Result<()>;

    /// Build (or watch-build) the project-reference graph rooted at
    /// `request.root_config` in dependency order.
    fn build_solution(&self, request: SolutionRequest<'_>) -> anyhow::Result<()>;
}
