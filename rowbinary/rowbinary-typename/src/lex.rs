use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, multispace1, one_of},
    combinator::{opt, recognize, value},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{pair, tuple},
};

/// Identifier: letter or `_`, then letters, digits and `_`.
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

pub fn ws(input: &str) -> IResult<&str, ()> {
    value((), multispace0)(input)
}

pub fn ws1(input: &str) -> IResult<&str, ()> {
    value((), multispace1)(input)
}

/// Signed decimal literal, kept as text so callers pick the integer width.
pub fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

/// Single-quoted literal with backslash escapes.
pub fn quoted(input: &str) -> IResult<&str, String> {
    let Some(body) = input.strip_prefix('\'') else {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    };
    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\'' => return Ok((&body[i + 1..], out)),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '0')) => out.push('\0'),
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            _ => out.push(c),
        }
    }
    Err(nom::Err::Failure(Error::new(input, ErrorKind::Escaped)))
}

/// Deepest parenthesis nesting, ignoring quoted text.
pub fn nesting_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_quote = false;
    let mut escaped = false;
    for c in input.chars() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '\'' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' => in_quote = true,
            '(' => {
                depth += 1;
                max = max.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_unescapes() {
        assert_eq!(quoted(r"'it\'s' rest"), Ok((" rest", "it's".to_string())));
        assert_eq!(quoted("''"), Ok(("", String::new())));
        assert!(quoted("'open").is_err());
    }

    #[test]
    fn depth_ignores_quoted_parens() {
        assert_eq!(nesting_depth("Array(Array(String))"), 2);
        assert_eq!(nesting_depth("Enum8('((' = 1)"), 1);
    }
}
