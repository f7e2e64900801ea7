//! Line protocol spoken with the game referee over stdin.
//!
//! The referee sends `TX TY` once, then for every turn `H N` followed by `N`
//! lines of `X Y`. Tokens are whitespace separated; line breaks carry no
//! meaning beyond separating tokens.

use std::{collections::VecDeque, io::BufRead, str::FromStr};

use thiserror::Error;
use thor_arena_core::Point;

/// Failures raised while reading referee input.
#[derive(Debug, Error)]
pub(crate) enum ProtocolError {
    /// Input ended in the middle of a message.
    #[error("input ended while reading {expected}")]
    UnexpectedEof {
        /// Field that was being read.
        expected: &'static str,
    },
    /// A token could not be parsed as the expected field.
    #[error("expected {expected}, found `{token}`")]
    InvalidToken {
        /// Field that was being read.
        expected: &'static str,
        /// Offending token.
        token: String,
    },
    /// The underlying reader failed.
    #[error("failed to read referee input")]
    Io(#[from] std::io::Error),
}

/// Observations delivered for a single turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TurnInput {
    /// Hammer charges the referee believes Thor has left.
    pub(crate) charges: u32,
    /// Giant positions, in referee order.
    pub(crate) hostiles: Vec<Point>,
}

/// Pulls protocol messages from a buffered reader one line at a time.
///
/// Lines are only read on demand, so the reader never blocks waiting for a
/// turn the referee has not sent yet.
#[derive(Debug)]
pub(crate) struct TurnReader<R> {
    input: R,
    tokens: VecDeque<String>,
    line: String,
}

impl<R: BufRead> TurnReader<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            tokens: VecDeque::new(),
            line: String::new(),
        }
    }

    /// Reads Thor's starting position.
    pub(crate) fn read_start(&mut self) -> Result<Point, ProtocolError> {
        self.read_point("Thor's starting position")
    }

    /// Reads the next turn, or `None` when input ends cleanly between turns.
    pub(crate) fn read_turn(&mut self) -> Result<Option<TurnInput>, ProtocolError> {
        let Some(token) = self.next_token()? else {
            return Ok(None);
        };
        let charges = parse_token(token, "remaining hammer strikes")?;
        let count: usize = self.read_value("giant count")?;

        let mut hostiles = Vec::new();
        for _ in 0..count {
            hostiles.push(self.read_point("giant position")?);
        }

        Ok(Some(TurnInput { charges, hostiles }))
    }

    fn read_point(&mut self, expected: &'static str) -> Result<Point, ProtocolError> {
        let x = self.read_value(expected)?;
        let y = self.read_value(expected)?;
        Ok(Point::new(x, y))
    }

    fn read_value<T: FromStr>(&mut self, expected: &'static str) -> Result<T, ProtocolError> {
        let token = self
            .next_token()?
            .ok_or(ProtocolError::UnexpectedEof { expected })?;
        parse_token(token, expected)
    }

    fn next_token(&mut self) -> Result<Option<String>, ProtocolError> {
        while self.tokens.is_empty() {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.tokens
                .extend(self.line.split_whitespace().map(str::to_owned));
        }
        Ok(self.tokens.pop_front())
    }
}

fn parse_token<T: FromStr>(token: String, expected: &'static str) -> Result<T, ProtocolError> {
    token
        .parse()
        .map_err(|_| ProtocolError::InvalidToken { expected, token })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_start_and_turns_until_clean_end() {
        let input = "3 6\n10 2\n1 1\n4 5\n9 0\n";
        let mut reader = TurnReader::new(input.as_bytes());

        assert_eq!(reader.read_start().expect("start"), Point::new(3, 6));
        assert_eq!(
            reader.read_turn().expect("turn"),
            Some(TurnInput {
                charges: 10,
                hostiles: vec![Point::new(1, 1), Point::new(4, 5)],
            })
        );
        assert_eq!(
            reader.read_turn().expect("turn"),
            Some(TurnInput {
                charges: 9,
                hostiles: Vec::new(),
            })
        );
        assert_eq!(reader.read_turn().expect("clean end"), None);
    }

    #[test]
    fn blank_lines_and_odd_spacing_are_ignored() {
        let input = "\n  0   0 \n\n5\n1\n  7 8\n";
        let mut reader = TurnReader::new(input.as_bytes());

        assert_eq!(reader.read_start().expect("start"), Point::new(0, 0));
        let turn = reader.read_turn().expect("turn").expect("turn present");
        assert_eq!(turn.charges, 5);
        assert_eq!(turn.hostiles, vec![Point::new(7, 8)]);
    }

    #[test]
    fn truncated_turn_is_an_error() {
        let mut reader = TurnReader::new("0 0\n3 2\n1 1\n".as_bytes());
        let _ = reader.read_start().expect("start");

        let error = reader.read_turn().expect_err("second giant is missing");

        assert!(matches!(
            error,
            ProtocolError::UnexpectedEof {
                expected: "giant position"
            }
        ));
    }

    #[test]
    fn huge_giant_count_with_short_body_is_truncated_input() {
        let mut reader = TurnReader::new("0 0\n1 99999999999999999\n3 4\n".as_bytes());
        let _ = reader.read_start().expect("start");

        let error = reader.read_turn().expect_err("only one giant follows");

        assert!(matches!(
            error,
            ProtocolError::UnexpectedEof {
                expected: "giant position"
            }
        ));
    }

    #[test]
    fn malformed_token_is_reported() {
        let mut reader = TurnReader::new("0 0\n-1 1\n".as_bytes());
        let _ = reader.read_start().expect("start");

        let error = reader.read_turn().expect_err("negative charges");

        assert_eq!(
            error.to_string(),
            "expected remaining hammer strikes, found `-1`"
        );
    }
}
