use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the tsfast driver.
///
/// The grammar matches the compiler toolkit's own command line for the flags
/// this front-end acts on; camelCase long names carry kebab-case aliases.
#[derive(Parser, Debug)]
#[command(
    name = "tsfast",
    version,
    about = "Fast transpile-only driver for TypeScript projects"
)]
pub struct CliArgs {
    /// Build one or more projects and their dependencies, if out of date.
    #[arg(short = 'b', long)]
    pub build: bool,

    /// Watch input files and recompile on changes.
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Save incremental compilation state to speed up subsequent runs.
    #[arg(short = 'i', long)]
    pub incremental: bool,

    /// Path to tsconfig.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    /// Generate .d.ts files from TypeScript files in your project.
    #[arg(short = 'd', long)]
    pub declaration: bool,

    /// Only output d.ts files and not JavaScript files.
    #[arg(long = "emitDeclarationOnly", alias = "emit-declaration-only")]
    pub emit_declaration_only: bool,

    /// Enable constraints that allow the project to be used with project references.
    #[arg(long)]
    pub composite: bool,

    /// Enable color and formatting in diagnostic output.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub pretty: Option<bool>,

    /// Input files to compile.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}
