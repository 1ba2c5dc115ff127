//! Diagnostics rendering and the checkpoint primitive.
//!
//! Every diagnostic-producing step routes its output through [`check`],
//! which is transparent for an empty sequence and otherwise renders all
//! diagnostics to the error stream and fails the invocation.

use colored::Colorize;
use rustc_hash::FxHashMap;
use std::path::Path;

use crate::cli::config::ResolvedOptions;
use crate::toolkit::{CompilerHost, Diagnostic, DiagnosticCategory, System};

/// Marker for a checkpoint that observed a non-empty diagnostic sequence.
/// Diagnostics have already been rendered when this is returned; the driver
/// maps it straight to a non-zero exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure;

/// Pretty (colorized, contextual) when `pretty` is explicitly set; otherwise
/// when the error stream is attached to an interactive terminal.
pub fn should_be_pretty(options: &ResolvedOptions, sys: &dyn System) -> bool {
    options
        .pretty
        .unwrap_or_else(|| sys.is_output_interactive())
}

/// Report-and-fail on a non-empty diagnostic sequence; no-op otherwise.
pub fn check(
    diagnostics: &[Diagnostic],
    host: &dyn CompilerHost,
    options: &ResolvedOptions,
    sys: &dyn System,
) -> Result<(), Failure> {
    if diagnostics.is_empty() {
        return Ok(());
    }

    let mut reporter = Reporter::new(should_be_pretty(options, sys), sys);
    let mut output = reporter.render(diagnostics, host);
    output.push_str(host.new_line());
    sys.write_error(&output);
    Err(Failure)
}

/// Formats diagnostics plain or colorized, with a source snippet and span
/// underline when the diagnostic carries a location.
pub struct Reporter<'a> {
    color: bool,
    sys: &'a dyn System,
    sources: FxHashMap<String, String>,
    line_starts: FxHashMap<String, Vec<u32>>,
}

impl<'a> Reporter<'a> {
    pub fn new(color: bool, sys: &'a dyn System) -> Self {
        Reporter {
            color,
            sys,
            sources: FxHashMap::default(),
            line_starts: FxHashMap::default(),
        }
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic], host: &dyn CompilerHost) -> String {
        let new_line = host.new_line().to_string();
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push_str(&new_line);
            }
            out.push_str(&self.format_diagnostic(diagnostic, host));
        }
        out
    }

    fn format_diagnostic(&mut self, diagnostic: &Diagnostic, host: &dyn CompilerHost) -> String {
        let mut output = String::new();

        if diagnostic.file.is_empty() {
            output.push_str(&self.format_category(diagnostic.category));
        } else {
            let display = self.display_path(&diagnostic.file, host);
            match self.position_for(&diagnostic.file, diagnostic.start) {
                Some((line, column)) => {
                    output.push_str(&format!("{display}:{line}:{column}"));
                }
                None => output.push_str(&display),
            }
            output.push_str(" - ");
            output.push_str(&self.format_category(diagnostic.category));
        }

        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if self.color
            && let Some(snippet) =
                self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }

        output
    }

    /// Contextual snippet matching the toolkit's own output shape:
    /// the offending line, then a `~` underline covering the span.
    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }

        let (line, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?;
        let line_text = source.lines().nth((line - 1) as usize)?.to_string();

        let span_end = (column - 1 + length) as usize;
        let mut underline = String::new();
        for (offset, ch) in line_text.chars().enumerate() {
            let pad = if ch == '\t' { "    " } else { " " };
            if offset + 1 < column as usize {
                underline.push_str(pad);
            } else if offset < span_end {
                underline.push_str(if ch == '\t' { "~~~~" } else { "~" });
            } else {
                break;
            }
        }
        if underline.trim().is_empty() {
            underline.push('~');
        }

        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };

        Some(format!(
            "\n  {line:>3}   {line_text}\n       {underline}"
        ))
    }

    fn display_path(&self, file: &str, host: &dyn CompilerHost) -> String {
        let canonical = host.canonical_file_name(Path::new(file));
        match canonical.strip_prefix(host.current_directory()) {
            Ok(relative) if !relative.as_os_str().is_empty() => {
                relative.display().to_string()
            }
            _ => canonical.display().to_string(),
        }
    }

    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        if !self.sources.contains_key(file) {
            let contents = self.sys.read_file(Path::new(file))?;
            self.line_starts
                .insert(file.to_string(), line_starts(&contents));
            self.sources.insert(file.to_string(), contents);
        }

        let starts = self.line_starts.get(file)?;
        let line_index = match starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let line_start = starts.get(line_index).copied()?;
        // Columns are character counts, not byte offsets.
        let column = self
            .sources
            .get(file)
            .and_then(|source| source.get(line_start as usize..offset as usize))
            .map(|prefix| prefix.chars().count() as u32)
            .unwrap_or(offset - line_start);
        Some((line_index as u32 + 1, column + 1))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("TS{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

fn line_starts(source: &str) -> Vec<u32> {
    let mut starts = vec![0];
    for (index, byte) in source.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(index as u32 + 1);
        }
    }
    starts
}
