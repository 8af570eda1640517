//! Source renderer for rewritten templates
//!
//! This module takes a syntax tree and produces Go source text. Output is
//! all-or-nothing: a token without a source position or output that no
//! longer parses is an error, never a partial string.

pub mod config;
mod printer;

pub use config::{RenderConfig, DEFAULT_HEADER};

use thiserror::Error;

use crate::parser::{parse_file, Expr, File};
use crate::ParseError;
use printer::Printer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("token `{text}` has no source position")]
    MissingPosition { text: String },

    #[error("rendered source does not parse: {}", errors.first().map(ToString::to_string).unwrap_or_default())]
    InvalidOutput {
        source_text: String,
        errors: Vec<ParseError>,
    },
}

/// Render a file to Go source
pub fn render(file: &File, config: &RenderConfig) -> Result<String, RenderError> {
    let mut printer = Printer::new(true);
    printer.file(file);
    if let Some(text) = printer.missing.take() {
        return Err(RenderError::MissingPosition { text });
    }
    let body = printer.finish();

    let output = match &config.header {
        Some(header) => format!("{}\n\n{}", header, body.trim_start_matches('\n')),
        None => body,
    };

    if config.verify {
        if let Err(errors) = parse_file(&output) {
            return Err(RenderError::InvalidOutput {
                source_text: output,
                errors,
            });
        }
    }
    Ok(output)
}

/// Render a file without any checks
pub fn render_file_unchecked(file: &File) -> String {
    let mut printer = Printer::new(false);
    printer.file(file);
    printer.finish()
}

/// Render a type expression, including its leading trivia
pub fn render_expr(expr: &Expr) -> String {
    let mut printer = Printer::new(false);
    printer.expr(expr);
    printer.finish()
}
