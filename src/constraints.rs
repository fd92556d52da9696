use crate::{
    feedback::{Feedback, Mark},
    words::{Letter, LetterMap, LetterSet, Word},
};
use std::borrow::Cow;

/// Knowledge accumulated from the guesses of one round.
///
/// A pinned position is never unpinned and minimum counts only grow, so
/// every call to [`Constraints::reduce`] keeps or shrinks the candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints {
    allowed: Vec<LetterSet>,
    definite: Vec<Option<Letter>>,
    min_count: LetterMap<u8>,
}

impl Constraints {
    pub fn new(word_length: usize) -> Self {
        Self {
            allowed: vec![LetterSet::FULL; word_length],
            definite: vec![None; word_length],
            min_count: Default::default(),
        }
    }

    pub fn word_length(&self) -> usize {
        self.definite.len()
    }

    pub fn definite(&self, pos: usize) -> Option<Letter> {
        self.definite.get(pos).copied().flatten()
    }

    pub fn allowed(&self, pos: usize) -> LetterSet {
        self.allowed.get(pos).copied().unwrap_or(LetterSet::EMPTY)
    }

    pub fn min_count(&self, letter: Letter) -> u8 {
        self.min_count[letter]
    }

    /// Folds one guess into the constraints and keeps the candidates that
    /// still satisfy all of them. Returns `None`, leaving everything
    /// untouched, when the feedback cancels the guess.
    pub fn reduce(&mut self, candidates: &[Word], guess: &Word, feedback: &Feedback) -> Option<Vec<Word>> {
        if feedback.is_cancelled() {
            return None;
        }
        self.restrict(guess, feedback);
        Some(self.filter(candidates))
    }

    pub fn filter(&self, candidates: &[Word]) -> Vec<Word> {
        candidates.iter().filter(|w| self.admits(w)).cloned().collect()
    }

    pub fn restrict(&mut self, guess: &Word, feedback: &Feedback) {
        if feedback.is_cancelled() {
            return;
        }
        let feedback = if feedback.is_solved() {
            Cow::Owned(Feedback::all_hits(guess.len()))
        } else {
            Cow::Borrowed(feedback)
        };
        let marked: Vec<(usize, Letter, Mark)> = guess
            .iter()
            .zip(feedback.marks().iter().copied())
            .take(self.word_length())
            .enumerate()
            .map(|(pos, (letter, mark))| (pos, letter, mark))
            .collect();

        // occurrences confirmed by this guess alone
        let mut matched: LetterMap<u8> = Default::default();
        for &(_, letter, mark) in &marked {
            if mark.is_match() {
                matched[letter] += 1;
            }
        }
        for (letter, &count) in matched.iter() {
            let min = &mut self.min_count[letter];
            *min = (*min).max(count);
        }

        for &(pos, letter, mark) in &marked {
            match mark {
                Mark::Hit => self.definite[pos] = Some(letter),
                Mark::Present => {
                    self.allowed[pos].remove(letter);
                }
                Mark::Absent | Mark::Cancel | Mark::Solved => {}
            }
        }

        for &(pos, letter, mark) in &marked {
            if mark != Mark::Absent {
                continue;
            }
            if matched[letter] > 0 {
                // the word has this letter, just not here and not more often than counted
                self.allowed[pos].remove(letter);
            } else {
                for (allowed, definite) in self.allowed.iter_mut().zip(&self.definite) {
                    if definite.is_none() {
                        allowed.remove(letter);
                    }
                }
            }
        }
    }

    pub fn admits(&self, word: &Word) -> bool {
        if word.len() != self.word_length() {
            return false;
        }
        let pinned = word
            .iter()
            .enumerate()
            .all(|(pos, letter)| self.definite(pos).map_or(true, |d| d == letter));
        if !pinned {
            return false;
        }
        let permitted = word
            .iter()
            .enumerate()
            .all(|(pos, letter)| self.definite(pos).is_some() || self.allowed(pos).contains(letter));
        if !permitted {
            return false;
        }
        word.letter_count()
            .iter()
            .all(|(letter, &count)| count >= self.min_count(letter))
    }
}
