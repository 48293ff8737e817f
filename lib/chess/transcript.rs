use crate::chess::{Color, ParseSanError, San};
use derive_more::{Display, Error};
use std::fmt::{self, Write};
use std::{slice, str::FromStr};

/// The moves of a game in [standard algebraic notation], in the order they were played.
///
/// [standard algebraic notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Standard_Algebraic_Notation_.28SAN.29
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Transcript {
    first: Color,
    number: usize,
    sans: Vec<San>,
}

impl Default for Transcript {
    #[inline(always)]
    fn default() -> Self {
        Transcript::new(Color::White, Vec::new())
    }
}

impl Transcript {
    /// Constructs a transcript whose first move is played by `first`.
    #[inline(always)]
    pub fn new(first: Color, sans: Vec<San>) -> Self {
        Transcript {
            first,
            number: 1,
            sans,
        }
    }

    /// Numbers the full moves starting from `number` instead of 1.
    #[inline(always)]
    pub fn starting_at(mut self, number: usize) -> Self {
        self.number = number.max(1);
        self
    }

    /// The side that plays the first move.
    #[inline(always)]
    pub fn first(&self) -> Color {
        self.first
    }

    /// The number of the full move the first move belongs to.
    #[inline(always)]
    pub fn number(&self) -> usize {
        self.number
    }

    /// The number of moves.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sans.len()
    }

    /// Whether there are no moves.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.sans.is_empty()
    }

    /// An iterator over the moves.
    #[inline(always)]
    pub fn iter(&self) -> slice::Iter<'_, San> {
        self.sans.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a San;
    type IntoIter = slice::Iter<'a, San>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Prints one full move per line, each preceded by its number.
impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut n = self.number;
        let mut side = self.first;

        for (i, san) in self.sans.iter().enumerate() {
            match side {
                Color::White => write!(f, "{n}. {san}")?,
                Color::Black if i == 0 => write!(f, "{n}... {san}")?,
                Color::Black => write!(f, " {san}")?,
            }

            if side == Color::Black {
                f.write_char('\n')?;
                n += 1;
            }

            side = !side;
        }

        if side == Color::Black {
            f.write_char('\n')?;
        }

        Ok(())
    }
}

/// The reason why parsing [`Transcript`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("failed to parse token `{token}`")]
pub struct ParseTranscriptError {
    pub token: String,
    pub source: ParseSanError,
}

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// A move number label split off the start of a token.
struct Label<'a> {
    number: &'a str,
    dots: usize,
    rest: &'a str,
}

fn label(token: &str) -> Option<Label<'_>> {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == token.len() {
        return None;
    }

    let number = &token[..token.len() - rest.len()];
    let san = rest.trim_start_matches('.');
    Some(Label {
        number,
        dots: rest.len() - san.len(),
        rest: san,
    })
}

/// Parses whitespace separated tokens, discarding move numbers and game results.
///
/// The label before the first move sets the starting move number, and three dots mean
/// black plays first.
impl FromStr for Transcript {
    type Err = ParseTranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut transcript = Transcript::default();

        for token in s.split_whitespace() {
            if RESULTS.contains(&token) {
                continue;
            }

            let token = match label(token) {
                Some(l) if l.dots > 0 || l.rest.is_empty() => {
                    if transcript.is_empty() {
                        if let Ok(n) = l.number.parse() {
                            transcript = transcript.starting_at(n);
                        }

                        if l.dots >= 3 {
                            transcript.first = Color::Black;
                        }
                    }

                    l.rest
                }

                _ => token,
            };

            if !token.is_empty() {
                let san = token.parse().map_err(|source| ParseTranscriptError {
                    token: token.to_string(),
                    source,
                })?;

                transcript.sans.push(san);
            }
        }

        Ok(transcript)
    }
}
