//! Expression classification with the oxc parser.
//!
//! Caller-supplied JS arrives as plain text. Before it is embedded anywhere
//! it must parse as exactly one expression of the expected kind, so a typo
//! fails the build instead of the page.

use oxc::allocator::Allocator;
use oxc::ast::ast::{Expression, Statement};
use oxc::parser::Parser;
use oxc::span::{GetSpan, SourceType};

/// What a source snippet turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// Regex literal, with its exact source text (e.g. `/lang=ar/i`).
    RegExp(String),
    /// Function or arrow function expression.
    Function,
    /// Some other expression; the payload describes it for error messages.
    Other(&'static str),
    /// Not a single valid expression.
    Invalid,
}

impl ExprKind {
    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::RegExp(_) => "a regular expression",
            Self::Function => "a function",
            Self::Other(desc) => desc,
            Self::Invalid => "invalid JavaScript",
        }
    }
}

/// Classify `source` as a single JS expression.
///
/// The snippet is parenthesized on its own lines so that object literals,
/// function expressions and trailing line comments all parse as one
/// expression statement.
pub fn classify_expression(source: &str) -> ExprKind {
    if source.trim().is_empty() {
        return ExprKind::Other("an empty string");
    }

    let wrapped = format!("(\n{source}\n);");
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &wrapped, SourceType::mjs()).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return ExprKind::Invalid;
    }

    let body = &ret.program.body;
    if body.len() != 1 {
        return ExprKind::Invalid;
    }
    match body.first() {
        Some(Statement::ExpressionStatement(stmt)) => kind_of(&stmt.expression, &wrapped),
        _ => ExprKind::Invalid,
    }
}

fn kind_of(expr: &Expression<'_>, text: &str) -> ExprKind {
    match expr {
        Expression::ParenthesizedExpression(inner) => kind_of(&inner.expression, text),
        Expression::RegExpLiteral(_) => {
            let span = expr.span();
            ExprKind::RegExp(text[span.start as usize..span.end as usize].to_string())
        }
        Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_) => {
            ExprKind::Function
        }
        Expression::StringLiteral(_) | Expression::TemplateLiteral(_) => ExprKind::Other("a string"),
        Expression::NumericLiteral(_) => ExprKind::Other("a number"),
        Expression::BooleanLiteral(_) => ExprKind::Other("a boolean"),
        Expression::NullLiteral(_) => ExprKind::Other("null"),
        Expression::ObjectExpression(_) => ExprKind::Other("an object"),
        Expression::ArrayExpression(_) => ExprKind::Other("an array"),
        Expression::Identifier(_) => ExprKind::Other("an identifier"),
        _ => ExprKind::Other("an expression"),
    }
}
