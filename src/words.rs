use color_eyre::{
    eyre::{bail, ensure},
    Report, Result,
};
use std::{
    fmt::{self, Debug, Display, Write},
    ops::{Index, IndexMut},
};

pub const ALPHABET_LEN: usize = 26;

/// One of the 26 letters, stored as its offset from `A`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Letter(u8);

impl Letter {
    pub const fn new(letter: char) -> Self {
        if !letter.is_ascii_uppercase() {
            panic!("letter out of range");
        }
        Self((letter as u8) - b'A')
    }

    pub fn all() -> impl Iterator<Item = Letter> {
        (0..ALPHABET_LEN as u8).map(Letter)
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<char> for Letter {
    type Error = Report;

    fn try_from(value: char) -> Result<Self> {
        if !value.is_ascii_alphabetic() {
            bail!("invalid letter: {value:?}")
        }
        Ok(Self::new(value.to_ascii_uppercase()))
    }
}

impl Debug for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Letter").field(&char::from(*self)).finish()
    }
}

impl Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(char::from(*self))
    }
}

impl From<Letter> for char {
    fn from(value: Letter) -> Self {
        (value.0 + b'A') as char
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LetterMap<T>([T; ALPHABET_LEN]);

impl<T> IndexMut<Letter> for LetterMap<T> {
    fn index_mut(&mut self, index: Letter) -> &mut Self::Output {
        &mut self.0[index.index()]
    }
}

impl<T> Index<Letter> for LetterMap<T> {
    type Output = T;

    fn index(&self, index: Letter) -> &Self::Output {
        &self.0[index.index()]
    }
}

impl<T> LetterMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Letter, &T)> {
        Letter::all().zip(self.0.iter())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.0.iter_mut()
    }
}

/// Set of letters packed into the low 26 bits.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct LetterSet(u32);

impl LetterSet {
    pub const EMPTY: LetterSet = LetterSet(0);
    pub const FULL: LetterSet = LetterSet(0x3FFFFFF);

    pub fn contains(self, letter: Letter) -> bool {
        self.0 & (1 << letter.0) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[cfg(test)]
    pub fn inverse(self) -> Self {
        Self(!self.0 & Self::FULL.0)
    }

    pub fn insert(&mut self, letter: Letter) -> bool {
        let old = self.0;
        self.0 |= 1 << letter.0;
        old != self.0
    }

    pub fn remove(&mut self, letter: Letter) -> bool {
        let old = self.0;
        self.0 &= !(1 << letter.0);
        old != self.0
    }
}

impl Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.into_iter().map(char::from))
            .finish()
    }
}

impl<const N: usize> From<[Letter; N]> for LetterSet {
    fn from(values: [Letter; N]) -> Self {
        values.into_iter().collect()
    }
}

impl FromIterator<Letter> for LetterSet {
    fn from_iter<T: IntoIterator<Item = Letter>>(iter: T) -> Self {
        let mut set = LetterSet::EMPTY;
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

impl IntoIterator for LetterSet {
    type Item = Letter;

    type IntoIter = LetterSetIter;

    fn into_iter(self) -> Self::IntoIter {
        LetterSetIter(self.0)
    }
}

pub struct LetterSetIter(u32);

impl Iterator for LetterSetIter {
    type Item = Letter;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.0.trailing_zeros();
        if next < ALPHABET_LEN as u32 {
            self.0 &= !(1 << next);
            Some(Letter(next as u8))
        } else {
            None
        }
    }
}

/// A validated, non-empty sequence of letters. Displayed in uppercase.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Word(Vec<Letter>);

impl Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|letter| write!(f, "{letter}"))
    }
}

impl Word {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Letter> + '_ {
        self.0.iter().copied()
    }

    pub fn first(&self) -> Letter {
        self.0[0]
    }

    pub fn last(&self) -> Letter {
        self.0[self.0.len() - 1]
    }

    #[cfg(test)]
    pub fn letters(&self) -> &[Letter] {
        &self.0
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        let len = suffix.len();
        len <= self.len()
            && self.0[self.len() - len..]
                .iter()
                .zip(suffix.chars())
                .all(|(&letter, ch)| char::from(letter) == ch)
    }

    #[inline]
    pub fn letter_count(&self) -> LetterMap<u8> {
        let mut count = LetterMap::default();
        for &letter in &self.0 {
            count[letter] += 1;
        }
        count
    }
}

impl TryFrom<&str> for Word {
    type Error = Report;

    fn try_from(value: &str) -> Result<Self> {
        let letters = value
            .chars()
            .map(Letter::try_from)
            .collect::<Result<Vec<_>>>()?;
        ensure!(!letters.is_empty(), "words must not be empty");
        Ok(Word(letters))
    }
}

impl TryFrom<Vec<Letter>> for Word {
    type Error = Report;

    fn try_from(value: Vec<Letter>) -> Result<Self> {
        ensure!(!value.is_empty(), "words must not be empty");
        Ok(Word(value))
    }
}

#[cfg(test)]
pub fn word(text: &str) -> Word {
    text.try_into().unwrap()
}
