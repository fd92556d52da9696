use color_eyre::{eyre::eyre, Result};
use std::fmt::{self, Display, Write};

/// Result reported for a single position of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mark {
    /// Letter not in the word, or all of its occurrences are already accounted for.
    #[default]
    Absent,
    /// Letter in the word, but not at this position.
    Present,
    /// Letter at the right position.
    Hit,
    /// Discard the guess, it was never played.
    Cancel,
    /// The guess was the answer, whatever the other marks say.
    Solved,
}

impl Mark {
    pub const fn symbol(self) -> char {
        match self {
            Mark::Absent => ' ',
            Mark::Present => 'V',
            Mark::Hit => '.',
            Mark::Cancel => '-',
            Mark::Solved => '+',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            ' ' => Some(Mark::Absent),
            'V' => Some(Mark::Present),
            '.' => Some(Mark::Hit),
            '-' => Some(Mark::Cancel),
            '+' => Some(Mark::Solved),
            _ => None,
        }
    }

    /// Next per-letter color in the absent, present, hit cycle.
    pub fn cycle(self) -> Self {
        match self {
            Mark::Absent => Mark::Present,
            Mark::Present => Mark::Hit,
            Mark::Hit | Mark::Cancel | Mark::Solved => Mark::Absent,
        }
    }

    pub fn is_match(self) -> bool {
        matches!(self, Mark::Hit | Mark::Present)
    }
}

/// Marks for a whole guess, always exactly one per position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback(Vec<Mark>);

impl Feedback {
    /// Truncates or right-pads with [`Mark::Absent`] to `len` positions.
    pub fn normalized(marks: impl IntoIterator<Item = Mark>, len: usize) -> Self {
        let mut marks: Vec<_> = marks.into_iter().take(len).collect();
        marks.resize(len, Mark::Absent);
        Self(marks)
    }

    pub fn parse(text: &str, len: usize) -> Result<Self> {
        let marks = text
            .chars()
            .map(|ch| Mark::from_symbol(ch).ok_or_else(|| eyre!("invalid feedback symbol: {ch:?}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::normalized(marks, len))
    }

    pub fn all_hits(len: usize) -> Self {
        Self(vec![Mark::Hit; len])
    }

    pub fn marks(&self) -> &[Mark] {
        &self.0
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.contains(&Mark::Cancel)
    }

    /// Either every position is a hit or a solved override is present.
    pub fn is_solved(&self) -> bool {
        self.0.contains(&Mark::Solved) || self.0.iter().all(|&mark| mark == Mark::Hit)
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|mark| f.write_char(mark.symbol()))
    }
}
