//! ClickHouse type-name parser for the RowBinary codec.
//!
//! Turns names such as `LowCardinality(Nullable(String))` or
//! `Map(String, Array(Decimal(18, 4)))` into [`TypeDescriptor`]s. Parsing is
//! the inverse of the descriptor's `Display` rendering.
//!
//! # Pipeline
//!
//! ```text
//! type name text
//!   └─ parser::type_expr: nom-based syntax → TypeExpr
//!       └─ resolver::resolve: kind lookup and parameter checks → TypeDescriptor
//! ```

mod error;
mod lex;
mod parser;
mod resolver;

pub use error::TypeNameError;
use rowbinary_core::TypeDescriptor;

/// Deepest parenthesis nesting accepted in one type name.
pub const MAX_NESTING: usize = 64;

/// Parse a type name as the server prints it.
pub fn parse_type_name(input: &str) -> Result<TypeDescriptor, TypeNameError> {
    let depth = lex::nesting_depth(input);
    if depth > MAX_NESTING {
        return Err(TypeNameError::Syntax {
            input: input.to_string(),
            offset: 0,
            detail: format!("nesting depth {depth} exceeds {MAX_NESTING}"),
        });
    }

    let syntax_error = |rest: &str, detail: String| TypeNameError::Syntax {
        input: input.to_string(),
        offset: input.len() - rest.len(),
        detail,
    };
    let expr = match parser::type_expr(input.trim_start()) {
        Ok((rest, expr)) => {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return Err(syntax_error(rest, format!("unexpected '{rest}'")));
            }
            expr
        }
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            return Err(syntax_error(e.input, format!("{:?}", e.code)));
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(syntax_error("", "incomplete input".to_string()));
        }
    };

    resolver::resolve(&expr).map_err(|source| TypeNameError::Type {
        input: input.to_string(),
        source,
    })
}
