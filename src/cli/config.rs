//! Project configuration resolution.
//!
//! Locates `tsconfig.json` (or accepts an explicit file list), parses it with
//! JSONC tolerance and `extends` merging, layers command-line overrides on
//! top, and applies the invariant overrides that make the fast path fast:
//! `skipLibCheck`, `noResolve`, an empty `types` list, and — unless a
//! declaration/composite feature demands full checking — `noLib`.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::args::CliArgs;
use crate::cli::fs::{FileDiscoveryOptions, discover_source_files};
use crate::toolkit::{Diagnostic, System};

pub(crate) mod codes {
    pub const CANNOT_READ_FILE: u32 = 5083;
    pub const CIRCULAR_EXTENDS: u32 = 18000;
    pub const NO_INPUTS: u32 = 18003;
}

/// Failure modes of configuration resolution. Every variant is fatal: the
/// driver reports once and maps it to a non-zero exit status.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found")]
    NotFound,
    #[error("Failed to parse config")]
    ParseFailed { path: PathBuf, detail: String },
    /// A diagnostic raised mid-parse severe enough to abort resolution.
    /// Routed through the diagnostics reporter like any checkpoint failure.
    #[error("unrecoverable configuration diagnostic")]
    Unrecoverable(Diagnostic),
}

/// The single effective configuration every strategy consumes.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path of the configuration file, when one was discovered.
    pub config_file: Option<PathBuf>,
    pub file_names: Vec<PathBuf>,
    pub options: ResolvedOptions,
    pub project_references: Vec<ProjectReference>,
    /// Config-parse diagnostics, forwarded through the program's
    /// `config_file_parsing_diagnostics` checkpoint.
    pub errors: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReference {
    pub path: PathBuf,
}

/// Effective compiler options after file/CLI merging and invariant overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub build: bool,
    pub watch: bool,
    pub incremental: bool,
    pub declaration: bool,
    pub emit_declaration_only: bool,
    pub composite: bool,
    pub pretty: Option<bool>,
    pub out_dir: Option<PathBuf>,
    pub skip_lib_check: bool,
    pub no_resolve: bool,
    pub no_emit_on_error: bool,
    pub no_lib: bool,
    pub types: Option<Vec<String>>,
    pub lib: Option<Vec<String>>,
}

/// Accepts both `true` and `"true"`, which real-world tsconfig files contain.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(value)) => Ok(Some(value)),
        Some(BoolOrString::String(text)) => match text.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            other => Err(Error::custom(format!(
                "invalid boolean value: '{other}'. Expected true or false"
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub compiler_options: Option<ConfigCompilerOptions>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
    #[serde(default)]
    pub references: Option<Vec<ConfigProjectReference>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigProjectReference {
    pub path: String,
}

/// The `compilerOptions` block, limited to the options this front-end acts
/// on. Unknown keys are ignored, matching the toolkit's lenient parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigCompilerOptions {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub declaration: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub emit_declaration_only: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub composite: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub incremental: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub pretty: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub skip_lib_check: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_resolve: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_emit_on_error: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_lib: Option<bool>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub lib: Option<Vec<String>>,
    #[serde(default)]
    pub out_dir: Option<String>,
}

/// Resolve the effective configuration for a command-line invocation.
///
/// Explicit input files (outside build mode) become the root set directly,
/// skipping config-file discovery; otherwise the nearest `tsconfig.json` is
/// discovered by walking upward from the project path (or, for `--build`,
/// the first positional argument) or the current directory.
pub fn resolve(args: &CliArgs, sys: &dyn System) -> Result<ResolvedConfig, ConfigError> {
    if !args.files.is_empty() && !args.build {
        let cwd = sys.current_directory();
        let file_names = args.files.iter().map(|f| absolute(f, &cwd)).collect();
        let mut options = ResolvedOptions::default();
        apply_cli_overrides(&mut options, args);
        apply_invariant_overrides(&mut options);
        return Ok(ResolvedConfig {
            config_file: None,
            file_names,
            options,
            project_references: Vec::new(),
            errors: Vec::new(),
        });
    }

    let config_path = find_config_file(args, sys)?;
    tracing::debug!(path = %config_path.display(), "discovered configuration file");
    resolve_config_file(&config_path, Some(args), sys)
}

/// Resolve a configuration file with no command-line overrides. Used by the
/// solution builder's config-reload callback so every member project of a
/// build graph picks up the invariant overrides.
pub fn resolve_for_build(
    config_path: &Path,
    sys: &dyn System,
) -> Result<ResolvedConfig, ConfigError> {
    resolve_config_file(config_path, None, sys)
}

fn resolve_config_file(
    config_path: &Path,
    args: Option<&CliArgs>,
    sys: &dyn System,
) -> Result<ResolvedConfig, ConfigError> {
    let config = load_tsconfig(config_path, sys)?;

    let mut options = options_from_config(config.compiler_options.as_ref());
    if let Some(args) = args {
        apply_cli_overrides(&mut options, args);
    }

    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut errors = Vec::new();
    let discovery = FileDiscoveryOptions {
        base_dir: config_dir.clone(),
        files: config.files.clone(),
        include: config.include.clone(),
        exclude: config.exclude.clone(),
        out_dir: options.out_dir.clone(),
    };
    let file_names = match discover_source_files(&discovery) {
        Ok(files) => files,
        Err(err) => {
            errors.push(Diagnostic::error(codes::CANNOT_READ_FILE, err.to_string()));
            Vec::new()
        }
    };
    if file_names.is_empty() && errors.is_empty() {
        errors.push(Diagnostic::error(
            codes::NO_INPUTS,
            format!(
                "No inputs were found in config file '{}'.",
                config_path.display()
            ),
        ));
    }

    let project_references = config
        .references
        .unwrap_or_default()
        .into_iter()
        .map(|reference| ProjectReference {
            path: absolute(Path::new(&reference.path), &config_dir),
        })
        .collect();

    apply_invariant_overrides(&mut options);

    Ok(ResolvedConfig {
        config_file: Some(config_path.to_path_buf()),
        file_names,
        options,
        project_references,
        errors,
    })
}

/// Walk upward from the declared project path (or the current directory)
/// until a `tsconfig.json` is found. Returns an absolute path; build mode
/// depends on this for directory-relative lookups downstream.
fn find_config_file(args: &CliArgs, sys: &dyn System) -> Result<PathBuf, ConfigError> {
    let cwd = sys.current_directory();
    let start = if let Some(project) = args.project.as_deref() {
        absolute(project, &cwd)
    } else if args.build && let Some(first) = args.files.first() {
        absolute(first, &cwd)
    } else {
        cwd.clone()
    };

    // The declared path may name the config file itself.
    if sys.file_exists(&start) {
        return Ok(start);
    }

    let mut dir = start.as_path();
    loop {
        let candidate = dir.join("tsconfig.json");
        if sys.file_exists(&candidate) {
            return Ok(candidate);
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return Err(ConfigError::NotFound),
        }
    }
}

/// Load a tsconfig file, following `extends` chains child-over-base with
/// cycle detection.
pub fn load_tsconfig(path: &Path, sys: &dyn System) -> Result<TsConfig, ConfigError> {
    let mut visited = FxHashSet::default();
    load_tsconfig_inner(path, sys, &mut visited, true)
}

fn load_tsconfig_inner(
    path: &Path,
    sys: &dyn System,
    visited: &mut FxHashSet<PathBuf>,
    is_root: bool,
) -> Result<TsConfig, ConfigError> {
    if !visited.insert(path.to_path_buf()) {
        return Err(ConfigError::Unrecoverable(Diagnostic::error(
            codes::CIRCULAR_EXTENDS,
            format!(
                "Circularity detected while resolving configuration: '{}'.",
                path.display()
            ),
        )));
    }

    let Some(source) = sys.read_file(path) else {
        if is_root {
            return Err(ConfigError::ParseFailed {
                path: path.to_path_buf(),
                detail: "could not read file".to_string(),
            });
        }
        return Err(ConfigError::Unrecoverable(Diagnostic::error(
            codes::CANNOT_READ_FILE,
            format!("Cannot read file '{}'.", path.display()),
        )));
    };

    let mut config = parse_tsconfig(&source).map_err(|err| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends);
        let base = load_tsconfig_inner(&base_path, sys, visited, false)?;
        config = merge_configs(base, config);
    }

    visited.remove(path);
    Ok(config)
}

/// Parse tsconfig source. The grammar is JSONC: line and block comments and
/// trailing commas are tolerated.
pub fn parse_tsconfig(source: &str) -> Result<TsConfig, serde_json::Error> {
    let normalized = strip_trailing_commas(&strip_comments(source));
    serde_json::from_str(&normalized)
}

fn resolve_extends_path(current: &Path, extends: &str) -> PathBuf {
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }
    if candidate.is_absolute() {
        candidate
    } else {
        current
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(candidate)
    }
}

fn merge_configs(base: TsConfig, mut child: TsConfig) -> TsConfig {
    let compiler_options = match (base.compiler_options, child.compiler_options.take()) {
        (Some(base_opts), Some(child_opts)) => {
            Some(merge_compiler_options(base_opts, child_opts))
        }
        (base_opts, child_opts) => child_opts.or(base_opts),
    };

    TsConfig {
        extends: None,
        compiler_options,
        include: child.include.or(base.include),
        exclude: child.exclude.or(base.exclude),
        files: child.files.or(base.files),
        references: child.references.or(base.references),
    }
}

fn merge_compiler_options(
    base: ConfigCompilerOptions,
    child: ConfigCompilerOptions,
) -> ConfigCompilerOptions {
    ConfigCompilerOptions {
        declaration: child.declaration.or(base.declaration),
        emit_declaration_only: child.emit_declaration_only.or(base.emit_declaration_only),
        composite: child.composite.or(base.composite),
        incremental: child.incremental.or(base.incremental),
        pretty: child.pretty.or(base.pretty),
        skip_lib_check: child.skip_lib_check.or(base.skip_lib_check),
        no_resolve: child.no_resolve.or(base.no_resolve),
        no_emit_on_error: child.no_emit_on_error.or(base.no_emit_on_error),
        no_lib: child.no_lib.or(base.no_lib),
        types: child.types.or(base.types),
        lib: child.lib.or(base.lib),
        out_dir: child.out_dir.or(base.out_dir),
    }
}

fn options_from_config(options: Option<&ConfigCompilerOptions>) -> ResolvedOptions {
    let mut resolved = ResolvedOptions::default();
    let Some(options) = options else {
        return resolved;
    };

    resolved.declaration = options.declaration.unwrap_or(false);
    resolved.emit_declaration_only = options.emit_declaration_only.unwrap_or(false);
    resolved.composite = options.composite.unwrap_or(false);
    resolved.incremental = options.incremental.unwrap_or(false);
    resolved.pretty = options.pretty;
    resolved.skip_lib_check = options.skip_lib_check.unwrap_or(false);
    resolved.no_resolve = options.no_resolve.unwrap_or(false);
    resolved.no_emit_on_error = options.no_emit_on_error.unwrap_or(false);
    resolved.no_lib = options.no_lib.unwrap_or(false);
    resolved.types = options.types.clone();
    resolved.lib = options.lib.clone();
    resolved.out_dir = options
        .out_dir
        .as_deref()
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from);

    resolved
}

/// Command-line options win over the on-disk file on conflict.
pub fn apply_cli_overrides(options: &mut ResolvedOptions, args: &CliArgs) {
    if args.build {
        options.build = true;
    }
    if args.watch {
        options.watch = true;
    }
    if args.incremental {
        options.incremental = true;
    }
    if args.declaration {
        options.declaration = true;
    }
    if args.emit_declaration_only {
        options.emit_declaration_only = true;
    }
    if args.composite {
        options.composite = true;
    }
    if args.pretty.is_some() {
        options.pretty = args.pretty;
    }
}

/// Force the options this front-end never lets user configuration override.
///
/// `noResolve` and `skipLibCheck` with an empty `types` list remove the two
/// most expensive resolution phases; `noLib` removes library-file parsing
/// entirely, but only when nothing demands full library-aware checking.
/// Applied exactly once, before any strategy runs; downstream code never
/// mutates these again.
pub fn apply_invariant_overrides(options: &mut ResolvedOptions) {
    options.skip_lib_check = true;
    options.no_resolve = true;
    options.types = Some(Vec::new());
    options.no_emit_on_error = false;
    if !forces_full_checking(options) {
        options.no_lib = true;
        options.lib = None;
    }
}

/// Declaration emission and composite/project-reference builds require full
/// library-aware checking and cannot safely run library-free.
pub(crate) fn forces_full_checking(options: &ResolvedOptions) -> bool {
    options.declaration || options.emit_declaration_only || options.composite
}

pub(crate) fn absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Drop `//` and `/* */` comments, preserving newlines so parse-error line
/// numbers still point at the original source.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Elide commas that directly precede a closing brace or bracket.
fn strip_trailing_commas(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_string = false;
    let mut escape = false;

    for (index, ch) in source.char_indices() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == ',' {
            let rest = source[index + ch.len_utf8()..].trim_start();
            if rest.starts_with('}') || rest.starts_with(']') {
                continue;
            }
        }

        out.push(ch);
    }

    out
}
