//! Cell coordinates
//!
//! A coordinate addresses one cell of the grid. The canonical text form is
//! a column letter followed by a 1-based row number (`A1`, `T50`); rows and
//! columns are 0-based internally.

use crate::error::{Error, Result};
use crate::{MAX_COLUMNS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell coordinate (e.g. `A1`)
///
/// Immutable value type; the unique key of a cell. Construction and parsing
/// both enforce the grid caps ([`MAX_ROWS`] x [`MAX_COLUMNS`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    row: u32,
    col: u16,
}

impl Coordinate {
    /// Create a coordinate, failing if it lies outside the grid caps
    pub fn new(row: u32, col: u16) -> Result<Self> {
        let coordinate = Self { row, col };
        if row >= MAX_ROWS || col >= MAX_COLUMNS {
            return Err(Error::out_of_bounds(coordinate, MAX_ROWS, MAX_COLUMNS));
        }
        Ok(coordinate)
    }

    /// Row index (0-based internally, 1-based in display)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column index (0-based, A=0, B=1, ...)
    pub fn col(&self) -> u16 {
        self.col
    }

    /// Parse a coordinate from A1-style notation
    ///
    /// Case-insensitive; the parsed coordinate is normalized (display always
    /// uses upper-case letters).
    ///
    /// # Examples
    /// ```
    /// use vellum_core::Coordinate;
    ///
    /// let coord = Coordinate::parse("a1").unwrap();
    /// assert_eq!(coord.row(), 0);
    /// assert_eq!(coord.col(), 0);
    /// assert_eq!(coord.to_string(), "A1");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::MalformedCoordinate(s.into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == 0 {
            return Err(Error::MalformedCoordinate(s.into()));
        }

        let col = Self::letters_to_column(&s[..pos]).map_err(|e| match e {
            Error::OutOfBounds { .. } => {
                Error::out_of_bounds(s.to_uppercase(), MAX_ROWS, MAX_COLUMNS)
            }
            other => other,
        })?;

        let row_str = &s[pos..];
        if row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedCoordinate(s.into()));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::MalformedCoordinate(s.into()))?;

        // Rows are 1-based in text, 0-based internally
        if row == 0 {
            return Err(Error::MalformedCoordinate(s.into()));
        }
        let row = row - 1;

        if row >= MAX_ROWS {
            return Err(Error::out_of_bounds(s.to_uppercase(), MAX_ROWS, MAX_COLUMNS));
        }

        Ok(Self { row, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, ...)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, ...)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::MalformedCoordinate(letters.into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::MalformedCoordinate(letters.into()));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            // Checked inside the loop so long letter runs cannot overflow
            if col > MAX_COLUMNS as u32 {
                return Err(Error::out_of_bounds(
                    format!("{}1", letters.to_uppercase()),
                    MAX_ROWS,
                    MAX_COLUMNS,
                ));
            }
        }

        Ok(col as u16 - 1) // Convert to 0-based
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
