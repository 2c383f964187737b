//! Bracketed tree text parser: `(S (NP (NNP John)) (VP (VBZ runs)))`.

use nom::branch::alt;
use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, map};
use nom::error::{Error, ErrorKind, ParseError};
use nom::multi::many0;
use nom::sequence::delimited;
use nom::{Err, Finish, IResult, Parser};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{Child, ParseTree};

/// Deepest bracket nesting accepted; deeper input is rejected instead of exhausting the stack.
pub const MAX_DEPTH: usize = 200;

fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')'
}

/// A combinator that takes a parser `inner` and produces a parser that also consumes both leading and
/// trailing whitespace, returning the output of `inner`.
fn ws<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: Parser<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

// Labels may be empty: `( (S ...))` is a valid unlabeled root.
fn label(input: &str) -> IResult<&str, &str> {
    take_while(is_atom_char)(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(is_atom_char)(input)
}

fn child<'a>(depth: usize) -> impl FnMut(&'a str) -> IResult<&'a str, Child> {
    move |input| {
        alt((
            map(node(depth), Child::Tree),
            map(token, |t: &str| Child::Token(t.to_string())),
        ))(input)
    }
}

// `depth` is the nesting level of the bracket about to be opened, the root being 1.
fn node<'a>(depth: usize) -> impl FnMut(&'a str) -> IResult<&'a str, ParseTree> {
    move |start| {
        let (input, _) = char('(')(start)?;
        if depth > MAX_DEPTH {
            return Err(Err::Failure(Error::new(start, ErrorKind::TooLarge)));
        }
        let (input, _) = multispace0(input)?;
        let (input, label) = label(input)?;
        let (input, children) = many0(ws(child(depth + 1)))(input)?;
        let (input, _) = char(')')(input)?;
        Ok((input, ParseTree::new(label, children)))
    }
}

/// Parses one bracketed tree; surrounding whitespace is allowed, anything else is an error.
#[instrument(level = "debug", skip(input), fields(len = input.len()))]
pub fn parse_tree(input: &str) -> DomainResult<ParseTree> {
    match all_consuming(ws(node(1)))(input).finish() {
        Ok((_, tree)) => Ok(tree),
        Err(e) => {
            let offset = input.len() - e.input.len();
            debug!(offset, code = ?e.code, "tree text rejected");
            Err(DomainError::Parse {
                offset,
                message: describe(&e),
            })
        }
    }
}

fn describe(e: &Error<&str>) -> String {
    if e.code == ErrorKind::TooLarge {
        return format!("nesting deeper than {} levels", MAX_DEPTH);
    }
    match e.input.chars().next() {
        None => "unexpected end of input".to_string(),
        Some(c) => format!("unexpected {:?}", c),
    }
}
