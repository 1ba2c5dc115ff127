//! Strategy dispatch: resolve configuration, pick one of the four
//! compilation strategies, and drive the toolkit through it.

use anyhow::{Result, bail};
use std::path::Path;

use crate::cli::args::CliArgs;
use crate::cli::config::{self, ConfigError, ResolvedConfig, ResolvedOptions};
use crate::cli::light::LightProgramFactory;
use crate::cli::mode::{CompilationMode, EmitFidelity};
use crate::cli::reporter::{self, Failure};
use crate::toolkit::{Program, SolutionRequest, System, Toolkit, WatchRequest};

/// Process outcome the embedder maps to `std::process::exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    DiagnosticsPresent,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::DiagnosticsPresent => 1,
        }
    }
}

/// Entry point: resolve the effective configuration, select a strategy, and
/// run it. Watch strategies hand control to the toolkit's event loop and do
/// not return under normal operation.
pub fn run(args: &CliArgs, sys: &dyn System, toolkit: &dyn Toolkit) -> Result<ExitStatus> {
    let config = match config::resolve(args, sys) {
        Ok(config) => config,
        Err(ConfigError::NotFound) => {
            sys.write_error("Config file not found\n");
            return Ok(ExitStatus::DiagnosticsPresent);
        }
        Err(ConfigError::ParseFailed { path, detail }) => {
            tracing::debug!(path = %path.display(), %detail, "configuration parse failure");
            sys.write_error("Failed to parse config\n");
            return Ok(ExitStatus::DiagnosticsPresent);
        }
        Err(ConfigError::Unrecoverable(diagnostic)) => {
            // Routed through the reporter before any further resolution,
            // exactly like a checkpoint failure.
            let host = toolkit.create_host(&ResolvedOptions::default());
            let _ = reporter::check(&[diagnostic], host.as_ref(), &ResolvedOptions::default(), sys);
            return Ok(ExitStatus::DiagnosticsPresent);
        }
    };

    let mode = CompilationMode::select(&config.options);
    tracing::debug!(?mode, files = config.file_names.len(), "selected compilation mode");

    match mode {
        CompilationMode::Compile => compile(&config, sys, toolkit),
        CompilationMode::WatchCompile => watch_compile(&config, toolkit),
        CompilationMode::Build | CompilationMode::WatchBuild => {
            build(&config, sys, toolkit)
        }
    }
}

/// Single compile: construct a (possibly incremental) program and walk the
/// diagnostic checkpoints in order. Each checkpoint independently
/// short-circuits; later checkpoints are unreachable once one fails.
fn compile(config: &ResolvedConfig, sys: &dyn System, toolkit: &dyn Toolkit) -> Result<ExitStatus> {
    let host = toolkit.create_host(&config.options);
    let mut program = if config.options.incremental {
        toolkit.create_incremental_program(config, host.as_ref())
    } else {
        toolkit.create_program(config, host.as_ref())
    };

    let fidelity = EmitFidelity::of(&config.options);
    match run_checkpoints(program.as_mut(), fidelity, host.as_ref(), &config.options, sys) {
        Ok(()) => Ok(ExitStatus::Success),
        Err(Failure) => Ok(ExitStatus::DiagnosticsPresent),
    }
}

fn run_checkpoints(
    program: &mut dyn Program,
    fidelity: EmitFidelity,
    host: &dyn crate::toolkit::CompilerHost,
    options: &ResolvedOptions,
    sys: &dyn System,
) -> Result<(), Failure> {
    reporter::check(&program.syntactic_diagnostics(), host, options, sys)?;
    reporter::check(&program.options_diagnostics(), host, options, sys)?;
    reporter::check(&program.config_file_parsing_diagnostics(), host, options, sys)?;
    if fidelity == EmitFidelity::Full {
        reporter::check(&program.global_diagnostics(), host, options, sys)?;
    }

    let result = program.emit();
    tracing::debug!(
        emitted = result.emitted_files.len(),
        skipped = result.emit_skipped,
        "emit finished"
    );
    if fidelity == EmitFidelity::Full {
        reporter::check(&result.diagnostics, host, options, sys)?;
    }

    Ok(())
}

/// Watch compile: hand the configuration and the light program factory to
/// the toolkit's watch scheduler. The factory is re-invoked (and therefore
/// the suppression wrapping re-applied) on every detected file change.
fn watch_compile(config: &ResolvedConfig, toolkit: &dyn Toolkit) -> Result<ExitStatus> {
    let factory = LightProgramFactory::new(toolkit);
    toolkit.watch_compile(WatchRequest {
        config_path: config.config_file.as_deref(),
        config,
        create_program: factory.into_callback(),
    })?;
    Ok(ExitStatus::Success)
}

/// Project-reference build, with or without watching. Member configurations
/// are re-resolved through this crate so the invariant overrides apply to
/// every project in the graph.
fn build(config: &ResolvedConfig, sys: &dyn System, toolkit: &dyn Toolkit) -> Result<ExitStatus> {
    let Some(root_config) = config.config_file.as_deref() else {
        bail!("--build requires a discoverable tsconfig.json");
    };

    let factory = LightProgramFactory::new(toolkit);
    let load_config = Box::new(move |path: &Path| match config::resolve_for_build(path, sys) {
        Ok(member) => Some(member),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to resolve member project");
            None
        }
    });

    toolkit.build_solution(SolutionRequest {
        root_config,
        incremental: config.options.incremental,
        watch: config.options.watch,
        create_program: factory.into_callback(),
        load_config,
    })?;
    Ok(ExitStatus::Success)
}
