//! Syntax of ClickHouse type names.
//!
//! Every type name is an identifier optionally followed by a parenthesized
//! argument list. Arguments are nested type names, numbers, quoted strings,
//! `'name' = value` enum members, `name Type` tuple fields, or
//! `setting = value` pairs. Which arguments a kind accepts is checked later
//! by the resolver.

use nom::{
    IResult,
    branch::alt,
    character::complete::char,
    combinator::{map, opt},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
};

use crate::lex::{identifier, number, quoted, ws, ws1};

#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr<'a> {
    pub name: &'a str,
    /// `None` when the name has no parentheses at all.
    pub args: Option<Vec<Arg<'a>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg<'a> {
    Type(TypeExpr<'a>),
    Field(&'a str, TypeExpr<'a>),
    Number(&'a str),
    Text(String),
    EnumMember(String, &'a str),
    Setting(&'a str, &'a str),
}

pub fn type_expr(input: &str) -> IResult<&str, TypeExpr<'_>> {
    map(
        pair(identifier, opt(preceded(ws, arg_list))),
        |(name, args)| TypeExpr { name, args },
    )(input)
}

fn arg_list(input: &str) -> IResult<&str, Vec<Arg<'_>>> {
    delimited(
        pair(char('('), ws),
        separated_list0(tuple((ws, char(','), ws)), arg),
        pair(ws, char(')')),
    )(input)
}

/// Parse one argument (order matters: the more specific forms come first).
fn arg(input: &str) -> IResult<&str, Arg<'_>> {
    alt((
        map(separated_pair(quoted, equals, number), |(name, value)| {
            Arg::EnumMember(name, value)
        }),
        map(quoted, Arg::Text),
        map(number, Arg::Number),
        map(separated_pair(identifier, equals, number), |(key, value)| {
            Arg::Setting(key, value)
        }),
        map(separated_pair(identifier, ws1, type_expr), |(name, ty)| {
            Arg::Field(name, ty)
        }),
        map(type_expr, Arg::Type),
    ))(input)
}

fn equals(input: &str) -> IResult<&str, char> {
    delimited(ws, char('='), ws)(input)
}
