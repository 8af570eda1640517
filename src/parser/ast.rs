//! Syntax tree types for Go template sources
//!
//! Declarations and types are fully structured. Function bodies and value
//! initialisers are kept as token trees ([`Tt`]), with type literals inside
//! them (`map[...]...`, `interface{}`, ...) parsed into [`Expr`] nodes.
//! Every node owns its tokens, so printing the tree back reproduces the
//! original layout.

pub use super::lexer::{Pos, Span, Token, TokenKind};

/// Identifier with its token
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub token: Token,
}

impl Ident {
    pub fn new(token: Token) -> Self {
        Self { token }
    }

    pub fn name(&self) -> &str {
        &self.token.text
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.token.text = name.into();
    }

    pub fn pos(&self) -> Pos {
        self.token.pos
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token.text)
    }
}

/// Root node - one Go source file
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub package: Token,
    pub name: Ident,
    pub semi: Option<Token>,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Decl>,
    /// Trivia after the last token
    pub trailing: String,
}

/// Either a single spec or a parenthesised group of specs
#[derive(Debug, Clone, PartialEq)]
pub enum Specs<T> {
    Single(T),
    Group {
        lparen: Token,
        specs: Vec<T>,
        rparen: Token,
    },
}

impl<T> Specs<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Specs::Single(spec) => std::slice::from_ref(spec).iter(),
            Specs::Group { specs, .. } => specs.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        match self {
            Specs::Single(spec) => std::slice::from_mut(spec).iter_mut(),
            Specs::Group { specs, .. } => specs.iter_mut(),
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.iter_mut().nth(index)
    }
}

/// `import "path"` or `import ( ... )`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub import: Token,
    pub specs: Specs<ImportSpec>,
    pub semi: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    /// Alias name, `.` or `_`
    pub alias: Option<Token>,
    /// Quoted import path
    pub path: Token,
    pub semi: Option<Token>,
}

impl ImportSpec {
    /// Import path without quotes
    pub fn path_value(&self) -> &str {
        self.path.text.trim_matches(|c| c == '"' || c == '`')
    }
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `const` or `var` declaration
    Value(GenDecl<ValueSpec>),
    /// `type` declaration
    Type(GenDecl<TypeSpec>),
    /// Function or method declaration
    Func(FuncDecl),
}

/// Keyword-introduced declaration holding one or more specs
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl<S> {
    pub keyword: Token,
    pub specs: Specs<S>,
    pub semi: Option<Token>,
}

/// `a, b T = x, y`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub assign: Option<Token>,
    pub values: Vec<Tt>,
    pub semi: Option<Token>,
}

/// `Name T` or `Name = T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub assign: Option<Token>,
    pub ty: Expr,
    pub semi: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub func: Token,
    pub recv: Option<FieldList>,
    pub name: Ident,
    /// Signature; `ty.func` is always `None` here
    pub ty: FuncType,
    pub body: Option<Group>,
    pub semi: Option<Token>,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.recv.is_some()
    }
}

/// Type expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `T`
    Ident(Ident),
    /// `pkg.T`
    Selector(SelectorExpr),
    /// `T[A, B]`
    Index(IndexExpr),
    /// `*T`
    Star(StarExpr),
    /// `(T)`
    Paren(ParenExpr),
    /// `...T` in a parameter list
    Ellipsis(EllipsisExpr),
    /// `[N]T` or `[]T`
    Array(ArrayType),
    /// `map[K]V`
    Map(MapType),
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan(ChanType),
    /// `func(params) results`
    Func(FuncType),
    /// `struct { ... }`
    Struct(StructType),
    /// `interface { ... }`
    Interface(InterfaceType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub dot: Token,
    pub sel: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub lbrack: Token,
    pub indices: Vec<Expr>,
    pub rbrack: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarExpr {
    pub star: Token,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub lparen: Token,
    pub x: Box<Expr>,
    pub rparen: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipsisExpr {
    pub ellipsis: Token,
    pub elt: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub lbrack: Token,
    /// Length tokens; empty for a slice
    pub len: Vec<Token>,
    pub rbrack: Token,
    pub elt: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapType {
    pub map: Token,
    pub lbrack: Token,
    pub key: Box<Expr>,
    pub rbrack: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChanType {
    /// `<-` before `chan` (receive-only)
    pub recv: Option<Token>,
    pub chan: Token,
    /// `<-` after `chan` (send-only)
    pub send: Option<Token>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub func: Option<Token>,
    pub params: FieldList,
    pub results: Option<FieldList>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub keyword: Token,
    pub fields: FieldList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub keyword: Token,
    pub methods: FieldList,
}

/// Parameters, results, struct fields or interface elements
///
/// `open`/`close` are absent for an unparenthesised single result.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList {
    pub open: Option<Token>,
    pub fields: Vec<Field>,
    pub close: Option<Token>,
}

impl FieldList {
    /// A list holding one unnamed, unparenthesised entry
    pub fn single(ty: Expr) -> Self {
        Self {
            open: None,
            fields: vec![Field::anonymous(ty)],
            close: None,
        }
    }
}

/// `a, b T "tag"` followed by an optional `,` or `;`
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<Token>,
    pub sep: Option<Token>,
}

impl Field {
    pub fn anonymous(ty: Expr) -> Self {
        Self {
            names: vec![],
            ty,
            tag: None,
            sep: None,
        }
    }
}

/// Token tree: the unstructured content of bodies and initialisers
#[derive(Debug, Clone, PartialEq)]
pub enum Tt {
    Token(Token),
    Group(Group),
    /// Type literal introduced by `map`, `chan`, `func`, `struct` or `interface`
    Type(Expr),
}

/// Bracketed token trees: `( ... )`, `[ ... ]` or `{ ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub open: Token,
    pub items: Vec<Tt>,
    pub close: Token,
}

impl Tt {
    pub fn first_token(&self) -> Option<&Token> {
        match self {
            Tt::Token(token) => Some(token),
            Tt::Group(group) => Some(&group.open),
            Tt::Type(expr) => expr.first_token(),
        }
    }

    pub fn is_token(&self, kind: TokenKind) -> bool {
        matches!(self, Tt::Token(token) if token.kind == kind)
    }

    /// Whether this tree starts on a new line
    pub fn starts_line(&self) -> bool {
        self.first_token().map_or(false, Token::starts_line)
    }
}

impl Expr {
    pub fn first_token(&self) -> Option<&Token> {
        match self {
            Expr::Ident(ident) => Some(&ident.token),
            Expr::Selector(sel) => sel.x.first_token(),
            Expr::Index(index) => index.x.first_token(),
            Expr::Star(star) => Some(&star.star),
            Expr::Paren(paren) => Some(&paren.lparen),
            Expr::Ellipsis(ellipsis) => Some(&ellipsis.ellipsis),
            Expr::Array(array) => Some(&array.lbrack),
            Expr::Map(map) => Some(&map.map),
            Expr::Chan(chan) => Some(chan.recv.as_ref().unwrap_or(&chan.chan)),
            Expr::Func(func) => func.func.as_ref().or(func.params.open.as_ref()),
            Expr::Struct(st) => Some(&st.keyword),
            Expr::Interface(it) => Some(&it.keyword),
        }
    }

    pub fn first_token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Expr::Ident(ident) => Some(&mut ident.token),
            Expr::Selector(sel) => sel.x.first_token_mut(),
            Expr::Index(index) => index.x.first_token_mut(),
            Expr::Star(star) => Some(&mut star.star),
            Expr::Paren(paren) => Some(&mut paren.lparen),
            Expr::Ellipsis(ellipsis) => Some(&mut ellipsis.ellipsis),
            Expr::Array(array) => Some(&mut array.lbrack),
            Expr::Map(map) => Some(&mut map.map),
            Expr::Chan(chan) => Some(chan.recv.as_mut().unwrap_or(&mut chan.chan)),
            Expr::Func(func) => func.func.as_mut().or(func.params.open.as_mut()),
            Expr::Struct(st) => Some(&mut st.keyword),
            Expr::Interface(it) => Some(&mut it.keyword),
        }
    }

    /// Source position of the expression's first token
    pub fn pos(&self) -> Pos {
        self.first_token().map_or(Pos::NONE, |t| t.pos)
    }

    pub fn starts_line(&self) -> bool {
        self.first_token().map_or(false, Token::starts_line)
    }

    /// `interface{}` with no elements, or the predeclared alias `any`
    pub fn is_placeholder(&self) -> bool {
        match self {
            Expr::Interface(it) => it.methods.fields.is_empty(),
            Expr::Ident(ident) => ident.name() == "any",
            _ => false,
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

impl File {
    pub fn package_name(&self) -> &str {
        self.name.name()
    }

    /// Whether `path` is already imported
    pub fn imports_path(&self, path: &str) -> bool {
        self.imports
            .iter()
            .flat_map(|decl| decl.specs.iter())
            .any(|spec| spec.path_value() == path)
    }
}
