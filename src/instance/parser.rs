//! Line parsers for the instance text format.
//!
//! ```text
//! StringID   Type       x          y          demand     ReadyTime  DueDate    ServiceTime
//! D0         d          40.0       50.0       0.0        0.0        1236.0     0.0
//! S0         f          40.0       50.0       0.0        0.0        1236.0     0.0
//! C20        c          30.0       50.0       10.0       10.0       73.0       90.0
//!
//! Q Vehicle fuel tank capacity /77.75/
//! C Vehicle load capacity /200.0/
//! r fuel consumption rate /1.0/
//! g inverse refueling rate /3.47/
//! v average Velocity /1.0/
//! ```

use nom::{
    bytes::complete::take_while1,
    character::complete::{anychar, space0, space1},
    combinator::{all_consuming, opt},
    error::{Error, ErrorKind},
    number::complete::double,
    sequence::{preceded, tuple},
    IResult,
};

/// A node row before validation.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct NodeRow<'a> {
    pub id: &'a str,
    pub code: &'a str,
    pub x: f64,
    pub y: f64,
    pub demand: f64,
    /// `(ready, due, service)` when the row carries the schedule columns.
    pub schedule: Option<(f64, f64, f64)>,
}

/// One classified input line.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Line<'a> {
    Node(NodeRow<'a>),
    Parameter { key: char, value: &'a str },
    /// Header rows, blank lines and anything else without meaning.
    Ignored,
    /// Looked like a node row but did not parse.
    MalformedNode,
    /// Looked like a parameter row but did not parse.
    MalformedParameter,
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

fn node_row(input: &str) -> IResult<&str, NodeRow<'_>> {
    let (input, (_, id, _, code, _, x, _, y, _, demand)) = tuple((
        space0, token, space1, token, space1, double, space1, double, space1, double,
    ))(input)?;
    let (input, schedule) = opt(tuple((
        preceded(space1, double),
        preceded(space1, double),
        preceded(space1, double),
    )))(input)?;
    let (input, _) = space0(input)?;
    Ok((
        input,
        NodeRow {
            id,
            code,
            x,
            y,
            demand,
            schedule,
        },
    ))
}

/// The value sits between the last two slashes; the description before it
/// may contain slashes of its own.
fn parameter_row(input: &str) -> IResult<&str, (char, &str)> {
    let (rest, key) = preceded(space0, anychar)(input)?;
    let mut parts = rest.trim_end().rsplitn(3, '/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(""), Some(value), Some(_)) => Ok(("", (key, value.trim()))),
        _ => Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
    }
}

/// Node rows have a single-letter type code in their second column and no
/// slashes; parameter rows wrap their value in slashes.
pub(super) fn classify(line: &str) -> Line<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Line::Ignored;
    }

    if line.contains('/') {
        return match all_consuming(parameter_row)(line) {
            Ok((_, (key, value))) => Line::Parameter { key, value },
            Err(_) => Line::MalformedParameter,
        };
    }

    let looks_like_node = line
        .split_whitespace()
        .nth(1)
        .is_some_and(|code| code.chars().count() == 1);
    if !looks_like_node {
        return Line::Ignored;
    }

    match all_consuming(node_row)(line) {
        Ok((_, row)) => Line::Node(row),
        Err(_) => Line::MalformedNode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_node_row() {
        let line = "C20        c          30.0       50.0       10.0       10.0       73.0       90.0";
        let Line::Node(row) = classify(line) else {
            panic!("expected a node row");
        };
        assert_eq!(row.id, "C20");
        assert_eq!(row.code, "c");
        assert_eq!(row.x, 30.0);
        assert_eq!(row.y, 50.0);
        assert_eq!(row.demand, 10.0);
        assert_eq!(row.schedule, Some((10.0, 73.0, 90.0)));
    }

    #[test]
    fn test_short_node_row() {
        let Line::Node(row) = classify("S1 f 12.5 -3 0") else {
            panic!("expected a node row");
        };
        assert_eq!(row.code, "f");
        assert_eq!(row.y, -3.0);
        assert!(row.schedule.is_none());
    }

    #[test]
    fn test_node_row_with_tabs_and_crlf() {
        let Line::Node(row) = classify("D0\td\t40.0\t50.0\t0.0\r") else {
            panic!("expected a node row");
        };
        assert_eq!(row.id, "D0");
    }

    #[test]
    fn test_header_is_ignored() {
        let header = "StringID   Type       x          y          demand     ReadyTime  DueDate    ServiceTime";
        assert_eq!(classify(header), Line::Ignored);
        assert_eq!(classify(""), Line::Ignored);
        assert_eq!(classify("   "), Line::Ignored);
    }

    #[test]
    fn test_parameter_rows() {
        assert_eq!(
            classify("Q Vehicle fuel tank capacity /77.75/"),
            Line::Parameter {
                key: 'Q',
                value: "77.75"
            }
        );
        assert_eq!(
            classify("C Vehicle load capacity /200.0/  "),
            Line::Parameter {
                key: 'C',
                value: "200.0"
            }
        );
    }

    #[test]
    fn test_parameter_description_with_slashes() {
        assert_eq!(
            classify("Q fuel tank capacity (kWh/100km) /10/"),
            Line::Parameter {
                key: 'Q',
                value: "10"
            }
        );
        assert_eq!(
            classify("r rate a/b/c /0.5/\r"),
            Line::Parameter {
                key: 'r',
                value: "0.5"
            }
        );
    }

    #[test]
    fn test_malformed_rows() {
        assert_eq!(classify("C1 c 1.0 oops 10"), Line::MalformedNode);
        assert_eq!(classify("C1 c 1.0 2.0 10 0.0 5.0"), Line::MalformedNode);
        assert_eq!(classify("Q capacity /77.75"), Line::MalformedParameter);
        assert_eq!(classify("Q capacity /77.75/ trailing"), Line::MalformedParameter);
    }
}
