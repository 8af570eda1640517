//! Error types for parsing and generation

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::config::ConfigError;
use crate::mutate::MutateError;
use crate::renderer::RenderError;
use crate::template::LoaderError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf)
                    .unwrap();
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::parser::lexer::Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::parser::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::parser::lexer::Token) -> String {
    use crate::parser::lexer::TokenKind;
    match tok.kind {
        TokenKind::Ident => format!("identifier '{}'", tok.text),
        TokenKind::String | TokenKind::RawString => format!("string {}", tok.text),
        TokenKind::Number => format!("number {}", tok.text),
        TokenKind::Rune => format!("rune {}", tok.text),
        kind if kind.starts_type_literal() => format!("keyword '{}'", tok.text),
        _ => format!("'{}'", tok.text),
    }
}

/// Everything that can go wrong while specializing a template
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {}", path.display(), first_message(errors))]
    Parse {
        path: PathBuf,
        source_text: String,
        errors: Vec<ParseError>,
    },

    #[error("Invalid type expression `{expr}`: {}", first_message(errors))]
    TypeExpr { expr: String, errors: Vec<ParseError> },

    #[error("Type argument `{expr}` does not match the expected form {expected}")]
    InvalidTypeArgument { expr: String, expected: &'static str },

    #[error("Template does not have the expected structure at `{decl}`: {source}")]
    Structure {
        decl: String,
        #[source]
        source: MutateError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Formatter `{command}` failed: {message}")]
    Formatter { command: String, message: String },
}

fn first_message(errors: &[ParseError]) -> String {
    match errors.first() {
        Some(ParseError::Syntax { message, .. }) => message.clone(),
        None => "unknown error".to_string(),
    }
}

impl GenerateError {
    /// Render parse errors with source context; other errors use Display
    pub fn report(&self) -> String {
        match self {
            GenerateError::Parse {
                path,
                source_text,
                errors,
            } => errors
                .iter()
                .map(|e| e.format(source_text, &path.display().to_string()))
                .collect::<Vec<_>>()
                .join("\n"),
            GenerateError::TypeExpr { expr, errors } => errors
                .iter()
                .map(|e| e.format(expr, "<type>"))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}
