// ABOUTME: Reader module: nom tokenizers plus the S-expression grammar

use nom::{
    branch::alt,
    bytes::complete::{escaped, take_while, take_while1},
    character::complete::{anychar, char, digit1, multispace1, none_of},
    combinator::{opt, recognize, value},
    multi::many0,
    IResult, Parser,
};

use crate::error::{fatal, EvalError};
use crate::interp::Interp;
use crate::value::Value;

/// Parsed form, before it is lowered into heap values. Borrow-free so the
/// token layer stays independent of the interpreter state.
#[derive(Debug, Clone, PartialEq)]
enum Sexp {
    Fixnum(i64),
    Str(String),
    Symbol(String),
    Nil,
    Quote(Box<Sexp>),
    /// Elements plus an optional dotted tail.
    List(Vec<Sexp>, Option<Box<Sexp>>),
}

// ============================================================================
// Token parsers
// ============================================================================

/// Bytes that may appear in an identifier. Parens, quote, dot, whitespace,
/// semicolon, and double quote are structure; everything else printable in
/// this set is fair game, digits included.
fn is_symbol_byte(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&*+,-/:<=>?@_|".contains(c)
}

/// Parse a comment: `;` to end of line, discarded.
fn line_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = take_while(|c| c != '\n')(input)?;
    Ok((input, ()))
}

/// Skip whitespace and comments.
fn skip_ws(input: &str) -> &str {
    match many0(alt((value((), multispace1), line_comment))).parse(input) {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

/// Parse a fixnum token: optional leading `-`, then digits.
fn fixnum_token(input: &str) -> IResult<&str, &str> {
    recognize((opt(char('-')), digit1)).parse(input)
}

/// Parse a string literal. The body is returned exactly as written:
/// `\x` escape pairs protect the next byte from the lexer but are never
/// decoded.
fn string_token(input: &str) -> IResult<&str, &str> {
    let (input, _) = char('"')(input)?;

    // Empty strings have no body for `escaped` to chew on
    if let Ok((input, _)) = char::<_, nom::error::Error<&str>>('"')(input) {
        return Ok((input, ""));
    }

    let (input, body) = escaped(none_of("\"\\"), '\\', anychar)(input)?;
    let (input, _) = char('"')(input)?;
    Ok((input, body))
}

/// Parse an identifier: one or more symbol bytes.
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_symbol_byte)(input)
}

// ============================================================================
// Grammar
// ============================================================================

fn invalid(message: impl Into<String>) -> EvalError {
    EvalError::InvalidSyntax(message.into())
}

/// Offset of `rest` within `src`; `rest` is always a suffix of `src`.
fn byte_offset(src: &str, rest: &str) -> usize {
    src.len() - rest.len()
}

/// Parse one expression. `src` is the whole buffer, for error offsets.
fn read_exp<'a>(input: &'a str, src: &str) -> Result<(Sexp, &'a str), EvalError> {
    let input = skip_ws(input);
    let Some(first) = input.chars().next() else {
        return Err(invalid("unexpected end of input"));
    };
    match first {
        '\'' => {
            let (quoted, rest) = read_exp(&input[1..], src)?;
            Ok((Sexp::Quote(Box::new(quoted)), rest))
        }
        '(' => read_list_body(&input[1..], src),
        ')' => Err(invalid("unexpected `)`")),
        '.' => Err(invalid("`.` outside a list")),
        '"' => match string_token(input) {
            Ok((rest, body)) => Ok((Sexp::Str(body.to_string()), rest)),
            Err(_) => Err(invalid("unterminated string literal")),
        },
        _ => {
            if let Ok((rest, digits)) = fixnum_token(input) {
                let n: i64 = digits
                    .parse()
                    .map_err(|_| invalid(format!("fixnum out of range: {digits}")))?;
                return Ok((Sexp::Fixnum(n), rest));
            }
            if is_symbol_byte(first) {
                let Ok((rest, name)) = identifier(input) else {
                    fatal("identifier did not start at a symbol byte");
                };
                if name == "nil" {
                    Ok((Sexp::Nil, rest))
                } else {
                    Ok((Sexp::Symbol(name.to_string()), rest))
                }
            } else {
                // Not part of any token class. User programs cannot make
                // the lexer lose track, so this aborts rather than signals.
                fatal(&format!(
                    "illegal character {first:?} at byte {}",
                    byte_offset(src, input)
                ));
            }
        }
    }
}

/// Parse the inside of a list, the opening paren already consumed. Builds
/// the proper prefix first; a `.` rewrites the final cdr to the tail
/// expression, which must be single and followed by `)`.
fn read_list_body<'a>(mut input: &'a str, src: &str) -> Result<(Sexp, &'a str), EvalError> {
    let mut items = Vec::new();
    loop {
        input = skip_ws(input);
        match input.chars().next() {
            None => return Err(invalid("unterminated list")),
            Some(')') => {
                let sexp = if items.is_empty() {
                    Sexp::Nil
                } else {
                    Sexp::List(items, None)
                };
                return Ok((sexp, &input[1..]));
            }
            Some('.') => {
                if items.is_empty() {
                    return Err(invalid("nothing before `.` in dotted list"));
                }
                let after_dot = skip_ws(&input[1..]);
                if after_dot.starts_with(')') {
                    return Err(invalid("nothing after `.` in dotted list"));
                }
                let (tail, rest) = read_exp(after_dot, src)?;
                let rest = skip_ws(rest);
                match rest.chars().next() {
                    Some(')') => {
                        return Ok((Sexp::List(items, Some(Box::new(tail))), &rest[1..]));
                    }
                    None => return Err(invalid("unterminated list")),
                    Some(_) => return Err(invalid("more than one expression after `.`")),
                }
            }
            Some(_) => {
                let (item, rest) = read_exp(input, src)?;
                items.push(item);
                input = rest;
            }
        }
    }
}

// ============================================================================
// Lowering into heap values
// ============================================================================

fn lower(interp: &mut Interp, sexp: &Sexp) -> Value {
    match sexp {
        Sexp::Nil => Value::Nil,
        Sexp::Fixnum(n) => interp.fixnum(*n),
        Sexp::Str(text) => interp.string(text.clone()),
        Sexp::Symbol(name) => interp.intern(name),
        Sexp::Quote(inner) => {
            let quote = interp.intern("quote");
            let quoted = lower(interp, inner);
            let tail = interp.cons(quoted, Value::Nil);
            interp.cons(quote, tail)
        }
        Sexp::List(items, tail) => {
            let mut list = match tail {
                Some(tail) => lower(interp, tail),
                None => Value::Nil,
            };
            for item in items.iter().rev() {
                let car = lower(interp, item);
                list = interp.cons(car, list);
            }
            list
        }
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Streaming reader over a source buffer.
///
/// Re-entrant at the top-level grammar: each `read` call consumes exactly
/// one form, or reports end of input with `None` once only whitespace and
/// comments remain.
pub struct Reader<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Reader<'src> {
    pub fn new(src: &'src str) -> Self {
        Reader { src, pos: 0 }
    }

    /// Reads and lowers the next top-level form.
    pub fn read(&mut self, interp: &mut Interp) -> Result<Option<Value>, EvalError> {
        let rest = skip_ws(&self.src[self.pos..]);
        self.pos = byte_offset(self.src, rest);
        if rest.is_empty() {
            return Ok(None);
        }
        let (sexp, rest) = read_exp(rest, self.src)?;
        self.pos = byte_offset(self.src, rest);
        Ok(Some(lower(interp, &sexp)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::stringify;

    fn parse_one(input: &str) -> Result<Sexp, EvalError> {
        let (sexp, rest) = read_exp(input, input)?;
        assert!(skip_ws(rest).is_empty(), "trailing input: {rest:?}");
        Ok(sexp)
    }

    fn read_all(input: &str) -> Result<Vec<String>, EvalError> {
        let mut interp = Interp::new();
        let mut reader = Reader::new(input);
        let mut rendered = Vec::new();
        while let Some(form) = reader.read(&mut interp)? {
            rendered.push(stringify(interp.heap(), form));
        }
        Ok(rendered)
    }

    #[test]
    fn test_parse_fixnum() {
        assert_eq!(parse_one("42"), Ok(Sexp::Fixnum(42)));
        assert_eq!(parse_one("-42"), Ok(Sexp::Fixnum(-42)));
        assert_eq!(parse_one("0"), Ok(Sexp::Fixnum(0)));
        assert_eq!(parse_one("007"), Ok(Sexp::Fixnum(7)));
    }

    #[test]
    fn test_fixnum_out_of_range() {
        assert!(matches!(
            parse_one("99999999999999999999"),
            Err(EvalError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_parse_symbol() {
        assert_eq!(parse_one("foo"), Ok(Sexp::Symbol("foo".to_string())));
        assert_eq!(parse_one("+"), Ok(Sexp::Symbol("+".to_string())));
        assert_eq!(parse_one("-"), Ok(Sexp::Symbol("-".to_string())));
        assert_eq!(parse_one("<"), Ok(Sexp::Symbol("<".to_string())));
        assert_eq!(parse_one("foo-bar"), Ok(Sexp::Symbol("foo-bar".to_string())));
        assert_eq!(parse_one("a,b"), Ok(Sexp::Symbol("a,b".to_string())));
        assert_eq!(
            parse_one("#$%&@_|"),
            Ok(Sexp::Symbol("#$%&@_|".to_string()))
        );
    }

    #[test]
    fn test_nil_keyword_beats_identifier() {
        assert_eq!(parse_one("nil"), Ok(Sexp::Nil));
        assert_eq!(parse_one("nild"), Ok(Sexp::Symbol("nild".to_string())));
        assert_eq!(parse_one("NIL"), Ok(Sexp::Symbol("NIL".to_string())));
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse_one(r#""hello""#), Ok(Sexp::Str("hello".to_string())));
        assert_eq!(parse_one(r#""""#), Ok(Sexp::Str(String::new())));
        // The body is kept verbatim; escape pairs are not decoded.
        assert_eq!(
            parse_one(r#""say \"hi\"""#),
            Ok(Sexp::Str(r#"say \"hi\""#.to_string()))
        );
        assert_eq!(
            parse_one(r#""tab\tand\\more""#),
            Ok(Sexp::Str(r"tab\tand\\more".to_string()))
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            parse_one(r#""oops"#),
            Err(EvalError::InvalidSyntax(_))
        ));
        // A trailing backslash leaves the closing quote escaped
        assert!(matches!(
            parse_one("\"oops\\"),
            Err(EvalError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_one("()"), Ok(Sexp::Nil));
        assert_eq!(parse_one("( )"), Ok(Sexp::Nil));
        assert_eq!(
            parse_one("(1 2)"),
            Ok(Sexp::List(
                vec![Sexp::Fixnum(1), Sexp::Fixnum(2)],
                None
            ))
        );
    }

    #[test]
    fn test_parse_dotted_pair() {
        assert_eq!(
            parse_one("(1 . 2)"),
            Ok(Sexp::List(
                vec![Sexp::Fixnum(1)],
                Some(Box::new(Sexp::Fixnum(2)))
            ))
        );
        assert_eq!(
            parse_one("(1 2 . 3)"),
            Ok(Sexp::List(
                vec![Sexp::Fixnum(1), Sexp::Fixnum(2)],
                Some(Box::new(Sexp::Fixnum(3)))
            ))
        );
    }

    #[test]
    fn test_ill_formed_dotted_lists() {
        assert!(matches!(
            parse_one("( . 1)"),
            Err(EvalError::InvalidSyntax(_))
        ));
        assert!(matches!(
            parse_one("(1 . )"),
            Err(EvalError::InvalidSyntax(_))
        ));
        assert!(matches!(
            parse_one("(1 . 1 2)"),
            Err(EvalError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_unmatched_parens() {
        assert!(matches!(
            parse_one("(1 2"),
            Err(EvalError::InvalidSyntax(_))
        ));
        assert!(matches!(parse_one(")"), Err(EvalError::InvalidSyntax(_))));
    }

    #[test]
    fn test_quote_sugar() {
        assert_eq!(
            parse_one("'x"),
            Ok(Sexp::Quote(Box::new(Sexp::Symbol("x".to_string()))))
        );
        assert!(matches!(parse_one("'"), Err(EvalError::InvalidSyntax(_))));
    }

    #[test]
    fn test_comments_are_discarded() {
        assert_eq!(parse_one("; intro\n42 ; trailing"), Ok(Sexp::Fixnum(42)));
        assert_eq!(
            parse_one("(1 ; inside\n 2)"),
            Ok(Sexp::List(
                vec![Sexp::Fixnum(1), Sexp::Fixnum(2)],
                None
            ))
        );
    }

    #[test]
    fn test_reader_consumes_one_form_per_call() {
        let rendered = read_all("1 (2 3)\n'x").unwrap();
        assert_eq!(rendered, vec!["1", "(2 3)", "(quote x)"]);
    }

    #[test]
    fn test_reader_eof() {
        assert_eq!(read_all("").unwrap(), Vec::<String>::new());
        assert_eq!(read_all("  ; only a comment").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_lowered_dotted_spellings_normalize() {
        let rendered = read_all("'(1 . (2 3 . ()))").unwrap();
        assert_eq!(rendered, vec!["(quote (1 2 3))"]);
    }

    #[test]
    fn test_lowered_strings_round_trip() {
        let rendered = read_all(r#""say \"hi\"""#).unwrap();
        assert_eq!(rendered, vec![r#""say \"hi\"""#]);
    }

    #[test]
    fn test_adjacent_tokens() {
        let rendered = read_all("(+ 1'x)").unwrap();
        assert_eq!(rendered, vec!["(+ 1 (quote x))"]);
    }
}
