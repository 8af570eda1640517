//! Caller-supplied type arguments and rename tables

use crate::parser::{parse_type_expr, Expr, Pos};
use crate::renderer::render_expr;
use crate::GenerateError;

use super::primitives::propagate_position;

/// A concrete type parsed once from its text
#[derive(Debug, Clone, PartialEq)]
pub struct TypeArgument {
    text: String,
    expr: Expr,
}

impl TypeArgument {
    /// Parse a type expression such as `*Job` or `map[string]int`
    pub fn parse(text: &str) -> Result<Self, GenerateError> {
        let expr = parse_type_expr(text).map_err(|errors| GenerateError::TypeExpr {
            expr: text.to_string(),
            errors,
        })?;
        Ok(Self::from_expr(expr))
    }

    /// Parse a `map[K]V` expression into its key and value types
    pub fn parse_pair(text: &str) -> Result<(Self, Self), GenerateError> {
        match Self::parse(text)?.expr {
            Expr::Map(map) => Ok((Self::from_expr(*map.key), Self::from_expr(*map.value))),
            _ => Err(GenerateError::InvalidTypeArgument {
                expr: text.to_string(),
                expected: "map[K]V",
            }),
        }
    }

    pub fn from_expr(mut expr: Expr) -> Self {
        if let Some(first) = expr.first_token_mut() {
            first.trivia.clear();
        }
        let text = render_expr(&expr);
        Self { text, expr }
    }

    /// Canonical source text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// A fresh copy of the type placed at `pos`, preceded by `trivia`
    pub fn instantiate(&self, pos: Pos, trivia: &str) -> Expr {
        let mut expr = self.expr.clone();
        propagate_position(&mut expr, pos);
        if let Some(first) = expr.first_token_mut() {
            first.trivia = trivia.to_string();
        }
        expr
    }

    /// The type's base name, usable inside an identifier.
    ///
    /// Pointer markers and package qualifiers are dropped: `*pkg.Task`
    /// gives `Task`.
    pub fn stem(&self) -> String {
        let base = self.text.trim_start_matches('*');
        let base = base.rsplit('.').next().unwrap_or(base);
        base.chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect()
    }
}

impl std::fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Ordered old name -> new name mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenameTable {
    entries: Vec<(String, String)>,
}

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        let old = old.into();
        let new = new.into();
        match self.entries.iter_mut().find(|(o, _)| *o == old) {
            Some(entry) => entry.1 = new,
            None => self.entries.push((old, new)),
        }
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(o, _)| o == old)
            .map(|(_, n)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, n)| (o.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenameTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (old, new) in iter {
            table.insert(old, new);
        }
        table
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for RenameTable {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Upper-case the first character: `userCache` -> `UserCache`
pub fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
