//! Lexer for Go source using logos
//!
//! Tokens keep the whitespace and comments that precede them ("trivia"), so a
//! tree built from them can be printed back without losing layout.

use logos::Logos;

use crate::error::ParseError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // Keywords
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token(":")]
    Colon,

    // Operators that take part in type syntax
    #[token("*")]
    Star,
    #[token("<-")]
    Arrow,
    #[token("=")]
    Assign,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,

    // Every other operator; only its text matters
    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("&&")]
    #[token("||")]
    #[token("++")]
    #[token("--")]
    #[token("==")]
    #[token("!=")]
    #[token("<")]
    #[token(">")]
    #[token("<=")]
    #[token(">=")]
    #[token("!")]
    #[token(":=")]
    Operator,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 1)]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r"'([^'\\\n]|\\[^\n])+'")]
    Rune,

    // Comments (kept as trivia of the following token)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,
}

/// Skip to the end of a `/* */` comment; unterminated comments are errors
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> logos::FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            logos::FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            logos::FilterResult::Error(())
        }
    }
}

impl TokenKind {
    /// Keywords that open a type literal
    pub fn starts_type_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Func
                | TokenKind::Struct
                | TokenKind::Interface
        )
    }

    pub fn is_opener(self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace)
    }

    pub fn is_closer(self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace)
    }

    pub fn is_string(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::RawString)
    }
}

/// Position of a token: 1-based byte offset into its source, 0 when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos(pub u32);

impl Pos {
    pub const NONE: Pos = Pos(0);

    pub fn from_offset(offset: usize) -> Self {
        Pos(offset as u32 + 1)
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Byte offset into the source, if the position is known
    pub fn offset(self) -> Option<usize> {
        self.is_valid().then(|| self.0 as usize - 1)
    }
}

/// A lexed token together with the trivia preceding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Pos,
    pub trivia: String,
}

impl Token {
    /// A token that does not come from any source file.
    ///
    /// Its position is [`Pos::NONE`] until one is assigned.
    pub fn synthetic(kind: TokenKind, text: impl Into<String>, trivia: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            pos: Pos::NONE,
            trivia: trivia.into(),
        }
    }

    /// The same token placed at `pos`
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = pos;
        self
    }

    /// Whether a newline separates this token from the previous one
    pub fn starts_line(&self) -> bool {
        self.trivia.contains('\n')
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    pub fn span(&self) -> Span {
        let start = self.pos.offset().unwrap_or(0);
        start..start + self.text.len()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Tokens of one source text plus whatever trivia follows the last token
#[derive(Debug, Clone)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub trailing: String,
}

/// Lex Go source into tokens carrying their leading trivia
pub fn lex(source: &str) -> Result<Lexed, ParseError> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for (kind, span) in TokenKind::lexer(source).spanned() {
        let kind = kind.map_err(|_| ParseError::Syntax {
            span: span.clone(),
            message: format!("Unexpected character {:?}", &source[span.clone()]),
            expected: vec![],
        })?;
        tokens.push(Token {
            kind,
            text: source[span.clone()].to_string(),
            pos: Pos::from_offset(span.start),
            trivia: source[last..span.start].to_string(),
        });
        last = span.end;
    }

    Ok(Lexed {
        tokens,
        trailing: source[last..].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).unwrap().tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("func map chan interface struct mapping"),
            vec![
                TokenKind::Func,
                TokenKind::Map,
                TokenKind::Chan,
                TokenKind::Interface,
                TokenKind::Struct,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            kinds("<- <= << := ... . *"),
            vec![
                TokenKind::Arrow,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Ellipsis,
                TokenKind::Dot,
                TokenKind::Star,
            ]
        );
    }

    #[test]
    fn test_comments_become_trivia() {
        let lexed = lex("a // note\n/* block */ b").unwrap();
        assert_eq!(lexed.tokens.len(), 2);
        assert_eq!(lexed.tokens[1].trivia, " // note\n/* block */ ");
        assert!(lexed.tokens[1].starts_line());
        assert!(!lexed.tokens[0].starts_line());
    }

    #[test]
    fn test_positions_are_one_based() {
        let lexed = lex("package sync").unwrap();
        assert_eq!(lexed.tokens[0].pos, Pos(1));
        assert_eq!(lexed.tokens[1].pos, Pos(9));
        assert_eq!(lexed.tokens[1].span(), 8..12);
    }

    #[test]
    fn test_trailing_trivia_kept() {
        let lexed = lex("x\n// end\n").unwrap();
        assert_eq!(lexed.trailing, "\n// end\n");
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"42 1.5 "str\"ing" `raw` '\n' 'x'"#),
            vec![
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::String,
                TokenKind::RawString,
                TokenKind::Rune,
                TokenKind::Rune,
            ]
        );
    }

    #[test]
    fn test_unknown_character_is_error() {
        assert!(lex("a # b").is_err());
    }

    #[test]
    fn test_block_comment_with_stars() {
        let lexed = lex("/** doc **/ x").unwrap();
        assert_eq!(lexed.tokens.len(), 1);
        assert_eq!(lexed.tokens[0].trivia, "/** doc **/ ");
    }

    #[test]
    fn test_block_comment_spanning_lines() {
        let lexed = lex("a /* one\n * two */\nb").unwrap();
        assert_eq!(kinds("a /* one\n * two */\nb"), vec![TokenKind::Ident, TokenKind::Ident]);
        assert_eq!(lexed.tokens[1].trivia, " /* one\n * two */\n");
    }

    #[test]
    fn test_unterminated_block_comment_is_error() {
        assert!(lex("a /* open").is_err());
    }
}
