use crate::PerimeterError;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Selects records by their `year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum YearPredicate {
    Equals(i32),

    AtLeast(i32),

    /// Inclusive on both ends.
    Range(i32, i32),
}

impl YearPredicate {
    pub fn equals(year: i32) -> Self {
        Self::Equals(year)
    }

    pub fn at_least(year: i32) -> Self {
        Self::AtLeast(year)
    }

    pub fn range(start: i32, end: i32) -> Result<Self, PerimeterError> {
        let predicate = Self::Range(start, end);
        predicate.validate()?;
        Ok(predicate)
    }

    /// Returns an error for ranges whose start is after their end.
    pub fn validate(&self) -> Result<(), PerimeterError> {
        match *self {
            Self::Range(start, end) if start > end => {
                Err(PerimeterError::InvalidRange { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn matches(&self, year: i32) -> bool {
        match *self {
            Self::Equals(y) => year == y,
            Self::AtLeast(y) => year >= y,
            Self::Range(start, end) => (start..=end).contains(&year),
        }
    }
}

impl fmt::Display for YearPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(y) => write!(f, "{y}"),
            Self::AtLeast(y) => write!(f, "{y}.."),
            Self::Range(start, end) => write!(f, "{start}..{end}"),
        }
    }
}

/// Parses `2020`, `2010..` or `2010..2020`.
impl FromStr for YearPredicate {
    type Err = PerimeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mk_err = || PerimeterError::InvalidPredicate(s.to_owned());
        let parse_year = |y: &str| y.trim().parse::<i32>().map_err(|_| mk_err());

        match s.split_once("..") {
            None => Ok(Self::Equals(parse_year(s)?)),
            Some((start, end)) if end.trim().is_empty() => Ok(Self::AtLeast(parse_year(start)?)),
            Some((start, end)) => Self::range(parse_year(start)?, parse_year(end)?),
        }
    }
}
