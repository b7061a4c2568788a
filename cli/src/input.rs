use std::str::FromStr;

use minesweep_core::{Coord, Coord2, GameError, Intent};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid Syntax, expected <row>,<col> or <row>,<col>,?")]
    InvalidSyntax,
    #[error("Invalid Number '{0}'")]
    InvalidNumber(String),
}

/// One line of player input, rows and columns are 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlayerMove {
    pub row: i64,
    pub col: i64,
    pub intent: Intent,
}

impl PlayerMove {
    /// Zero-based `(x, y)` for the engine.
    pub fn coords(&self) -> Result<Coord2, GameError> {
        Ok((to_axis(self.col)?, to_axis(self.row)?))
    }
}

fn to_axis(one_based: i64) -> Result<Coord, GameError> {
    one_based
        .checked_sub(1)
        .and_then(|index| Coord::try_from(index).ok())
        .ok_or(GameError::OutOfBounds)
}

fn parse_number(token: &str) -> Result<i64, InputError> {
    token
        .parse()
        .map_err(|_| InputError::InvalidNumber(token.to_owned()))
}

impl FromStr for PlayerMove {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        let intent = match tokens.as_slice() {
            [_, _] => Intent::Reveal,
            [_, _, "?"] => Intent::ToggleFlag,
            _ => return Err(InputError::InvalidSyntax),
        };

        Ok(Self {
            row: parse_number(tokens[0])?,
            col: parse_number(tokens[1])?,
            intent,
        })
    }
}
