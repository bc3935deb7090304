use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_while1};
use nom::character::complete::{alpha1, alphanumeric1, char, space0};
use nom::combinator::{map, recognize};
use nom::multi::many0_count;
use nom::sequence::{delimited, pair};
use nom::IResult;

use crate::diagnostics::{Diagnostic, Span};

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    fn from_bare(word: &str) -> Self {
        match word.parse::<f64>() {
            Ok(x) => Literal::Number(x),
            Err(_) => Literal::Text(word.to_string()),
        }
    }
}

/// One `name = value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub value: Literal,
    pub name_span: Span,
    pub value_span: Span,
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn equals(input: &str) -> IResult<&str, char> {
    delimited(space0, char('='), space0)(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c: char| c == '"'), char('"'))(input)
}

fn bare(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '"')(input)
}

fn literal(input: &str) -> IResult<&str, Literal> {
    alt((
        map(quoted, |s: &str| Literal::Text(s.to_string())),
        map(bare, Literal::from_bare),
    ))(input)
}

/// Parse one trimmed segment starting at byte `base` of `src`.
fn parse_segment(src: &str, base: usize, seg: &str) -> Result<Assignment, Diagnostic> {
    let offset = |rest: &str| base + (seg.len() - rest.len());

    let (rest, name) = identifier(seg).map_err(|_| {
        Diagnostic::error(Span::in_source(src, base, base + seg.len()), "expected a factor name")
            .with_help("factor names use letters, digits and '_', e.g. 'wind_factor'")
    })?;
    let name_span = Span::in_source(src, base, offset(rest));

    let (rest, _) = equals(rest).map_err(|_| {
        let at = offset(rest);
        Diagnostic::error(
            Span::in_source(src, at, at + 1),
            format!("expected '=' after '{name}'"),
        )
        .with_help("write assignments as 'name = value'")
    })?;

    let value_start = offset(rest);
    let (rest, value) = literal(rest).map_err(|_| {
        let msg = if rest.starts_with('"') {
            "unterminated quoted value"
        } else {
            "expected a value"
        };
        Diagnostic::error(Span::in_source(src, value_start, value_start + 1), msg)
    })?;
    let value_span = Span::in_source(src, value_start, offset(rest));

    let trailing = rest.trim_start();
    if !trailing.is_empty() {
        let at = offset(trailing);
        return Err(Diagnostic::error(
            Span::in_source(src, at, base + seg.len()),
            "unexpected text after value",
        )
        .with_help("separate assignments with ',', ';' or a new line"));
    }

    Ok(Assignment {
        name: name.to_string(),
        value,
        name_span,
        value_span,
    })
}

/// Split `src` into `(byte offset, trimmed segment)` pairs, dropping
/// comments and empty segments.
fn segments(src: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut line_start = 0;
    for line in src.split_inclusive('\n') {
        let mut seg_start = 0;
        let mut code_end = line.len();
        let mut quoted = false;
        for (i, c) in line.char_indices() {
            match c {
                '"' => quoted = !quoted,
                '#' if !quoted => {
                    code_end = i;
                    break;
                }
                ',' | ';' if !quoted => {
                    push_segment(&mut out, line_start + seg_start, &line[seg_start..i]);
                    seg_start = i + 1;
                }
                _ => {}
            }
        }
        push_segment(&mut out, line_start + seg_start, &line[seg_start..code_end]);
        line_start += line.len();
    }
    out
}

fn push_segment<'a>(out: &mut Vec<(usize, &'a str)>, offset: usize, piece: &'a str) {
    let trimmed = piece.trim_start();
    let lead = piece.len() - trimmed.len();
    let trimmed = trimmed.trim_end();
    if !trimmed.is_empty() {
        out.push((offset + lead, trimmed));
    }
}

/// Parse a scenario, stopping at the first malformed assignment.
pub fn parse_scenario(src: &str) -> Result<Vec<Assignment>, Diagnostic> {
    segments(src)
        .into_iter()
        .map(|(base, seg)| parse_segment(src, base, seg))
        .collect()
}

/// Parse a scenario, recording malformed assignments in `diags` and
/// returning every assignment that did parse.
pub fn parse_scenario_recovering(src: &str, diags: &mut Vec<Diagnostic>) -> Vec<Assignment> {
    let mut out = Vec::new();
    for (base, seg) in segments(src) {
        match parse_segment(src, base, seg) {
            Ok(a) => out.push(a),
            Err(d) => {
                log::debug!("skipping malformed scenario segment {seg:?}: {}", d.message);
                diags.push(d);
            }
        }
    }
    out
}
