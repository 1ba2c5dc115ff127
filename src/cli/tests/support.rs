//! Shared fakes for driver, reporter, and light-program tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::cli::config::{ResolvedConfig, ResolvedOptions};
use crate::toolkit::{
    CompilerHost, Diagnostic, DiagnosticCategory, EmitResult, Program, SolutionRequest, System,
    Toolkit, WatchRequest,
};

/// Disk-backed [`System`] with a pinned working directory, a captured error
/// stream, and controllable TTY detection.
pub struct TestSystem {
    pub cwd: PathBuf,
    pub interactive: bool,
    stderr: RefCell<String>,
}

impl TestSystem {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        TestSystem {
            cwd: cwd.into(),
            interactive: false,
            stderr: RefCell::new(String::new()),
        }
    }

    pub fn stderr(&self) -> String {
        self.stderr.borrow().clone()
    }
}

impl System for TestSystem {
    fn current_directory(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn write_error(&self, text: &str) {
        self.stderr.borrow_mut().push_str(text);
    }

    fn is_output_interactive(&self) -> bool {
        self.interactive
    }
}

pub struct FakeHost {
    pub cwd: PathBuf,
}

impl FakeHost {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        FakeHost { cwd: cwd.into() }
    }
}

impl CompilerHost for FakeHost {
    fn canonical_file_name(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }

    fn current_directory(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn new_line(&self) -> &str {
        "\n"
    }
}

/// Program returning pre-seeded diagnostics from every accessor.
#[derive(Debug, Clone, Default)]
pub struct FakeProgram {
    pub syntactic: Vec<Diagnostic>,
    pub options_diags: Vec<Diagnostic>,
    pub config_diags: Vec<Diagnostic>,
    pub global: Vec<Diagnostic>,
    pub semantic: Vec<Diagnostic>,
    pub emit_result: EmitResult,
}

impl Program for FakeProgram {
    fn syntactic_diagnostics(&self) -> Vec<Diagnostic> {
        self.syntactic.clone()
    }

    fn options_diagnostics(&self) -> Vec<Diagnostic> {
        self.options_diags.clone()
    }

    fn config_file_parsing_diagnostics(&self) -> Vec<Diagnostic> {
        self.config_diags.clone()
    }

    fn global_diagnostics(&self) -> Vec<Diagnostic> {
        self.global.clone()
    }

    fn semantic_diagnostics(&self) -> Vec<Diagnostic> {
        self.semantic.clone()
    }

    fn emit(&mut self) -> EmitResult {
        self.emit_result.clone()
    }
}

pub struct RecordedSolution {
    pub root: PathBuf,
    pub incremental: bool,
    pub watch: bool,
}

/// Toolkit fake that clones a program template on every construction and
/// records how it was driven.
#[derive(Default)]
pub struct FakeToolkit {
    pub template: FakeProgram,
    pub calls: RefCell<Vec<String>>,
    /// Programs constructed through the factory callbacks, so tests can
    /// observe the light wrapping from outside.
    pub factory_programs: RefCell<Vec<Box<dyn Program>>>,
    pub solutions: RefCell<Vec<RecordedSolution>>,
    pub member_configs: RefCell<Vec<ResolvedConfig>>,
}

impl FakeToolkit {
    pub fn with_template(template: FakeProgram) -> Self {
        FakeToolkit {
            template,
            ..FakeToolkit::default()
        }
    }

    fn instantiate(&self, config: &ResolvedConfig) -> FakeProgram {
        let mut program = self.template.clone();
        program.config_diags.extend(config.errors.iter().cloned());
        program
    }
}

impl Toolkit for FakeToolkit {
    fn create_host(&self, _options: &ResolvedOptions) -> Box<dyn CompilerHost> {
        Box::new(FakeHost::new("/"))
    }

    fn create_program(
        &self,
        config: &ResolvedConfig,
        _host: &dyn CompilerHost,
    ) -> Box<dyn Program> {
        self.calls.borrow_mut().push("create_program".to_string());
        Box::new(self.instantiate(config))
    }

    fn create_incremental_program(
        &self,
        config: &ResolvedConfig,
        _host: &dyn CompilerHost,
    ) -> Box<dyn Program> {
        self.calls
            .borrow_mut()
            .push("create_incremental_program".to_string());
        Box::new(self.instantiate(config))
    }

    fn create_builder_program(&self, config: &ResolvedConfig) -> Box<dyn Program> {
        self.calls
            .borrow_mut()
            .push("create_builder_program".to_string());
        Box::new(self.instantiate(config))
    }

    fn watch_compile(&self, request: WatchRequest<'_>) -> anyhow::Result<()> {
        self.calls.borrow_mut().push("watch_compile".to_string());
        // Simulate the scheduler's initial build.
        let program = (request.create_program)(request.config);
        self.factory_programs.borrow_mut().push(program);
        Ok(())
    }

    fn build_solution(&self, request: SolutionRequest<'_>) -> anyhow::Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("build_solution(watch={})", request.watch));
        self.solutions.borrow_mut().push(RecordedSolution {
            root: request.root_config.to_path_buf(),
            incremental: request.incremental,
            watch: request.watch,
        });
        // Simulate the builder reloading the root project's config and
        // constructing a program for it.
        if let Some(member) = (request.load_config)(request.root_config) {
            let program = (request.create_program)(&member);
            self.factory_programs.borrow_mut().push(program);
            self.member_configs.borrow_mut().push(member);
        }
        Ok(())
    }
}

pub fn bare_diag(code: u32, message: &str) -> Diagnostic {
    Diagnostic::error(code, message)
}

pub fn file_diag(file: &Path, code: u32, message: &str, start: u32, length: u32) -> Diagnostic {
    Diagnostic {
        category: DiagnosticCategory::Error,
        code,
        message_text: message.to_string(),
        file: file.display().to_string(),
        start,
        length,
    }
}

pub fn config_with(options: ResolvedOptions) -> ResolvedConfig {
    ResolvedConfig {
        config_file: None,
        file_names: Vec::new(),
        options,
        project_references: Vec::new(),
        errors: Vec::new(),
    }
}
