//! tsfast — fast transpile-only front-end driver for TypeScript-style
//! compiler toolkits.
//!
//! Given raw command-line arguments and an on-disk project configuration,
//! this crate resolves the single effective configuration, selects one of
//! four compilation strategies (compile, watch compile, project-reference
//! build, watch build), and drives a compiler toolkit's program and host
//! abstractions while suppressing expensive diagnostic categories to trade
//! correctness guarantees for speed.
//!
//! The toolkit itself — scanner, parser, checker, emitter, watch scheduler,
//! solution builder — is an external collaborator behind the traits in
//! [`toolkit`]. An embedding binary supplies the implementation and maps the
//! returned [`cli::driver::ExitStatus`] to `std::process::exit`:
//!
//! ```no_run
//! use clap::Parser;
//! # fn toolkit() -> Box<dyn tsfast::toolkit::Toolkit> { unimplemented!() }
//!
//! fn main() -> anyhow::Result<()> {
//!     tsfast::tracing_config::init_tracing();
//!     let args = tsfast::cli::args::CliArgs::parse();
//!     let toolkit = toolkit();
//!     let status = tsfast::cli::driver::run(
//!         &args,
//!         &tsfast::toolkit::RealSystem,
//!         toolkit.as_ref(),
//!     )?;
//!     std::process::exit(status.code());
//! }
//! ```

pub mod cli;
pub mod toolkit;
pub mod tracing_config;
