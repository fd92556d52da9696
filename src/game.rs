use crate::{
    constraints::Constraints,
    feedback::Feedback,
    history::{History, Round},
    stats::Scorer,
    words::Word,
};
use color_eyre::Result;

/// What a guess did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The guess was withdrawn; nothing changed.
    Cancelled,
    /// The guess was the answer.
    Solved,
    /// The guess was recorded and the candidates filtered.
    Narrowed,
}

/// Candidates left for the player, split and ranked for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    pub recommended: Vec<(Word, f64)>,
    pub unused: Vec<Word>,
    pub used: Vec<Word>,
}

/// One round in progress.
#[derive(Clone, Debug)]
pub struct Game {
    list: Vec<Word>,
    constraints: Constraints,
    guesses: Vec<Word>,
}

impl Game {
    pub fn new(vocabulary: &[Word], word_length: usize) -> Self {
        Self {
            list: vocabulary.to_vec(),
            constraints: Constraints::new(word_length),
            guesses: Vec::new(),
        }
    }

    pub fn apply_feedback(&mut self, guess: Word, feedback: &Feedback) -> Outcome {
        log::debug!("applying {guess} [{feedback}]");
        let outcome = if feedback.is_solved() && !feedback.is_cancelled() {
            Outcome::Solved
        } else {
            let Some(list) = self.constraints.reduce(&self.list, &guess, feedback) else {
                return Outcome::Cancelled;
            };
            log::debug!("{} of {} candidates remain", list.len(), self.list.len());
            self.list = list;
            Outcome::Narrowed
        };
        self.guesses.push(guess);
        outcome
    }

    pub fn suggestions(&self, history: &History, scorer: &Scorer, limit: usize) -> Suggestions {
        let (unused, used) = history.partition(&self.list);
        let mut recommended = scorer.rank(&unused);
        recommended.truncate(limit);
        Suggestions {
            recommended,
            unused,
            used,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.list
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    pub fn into_round(self) -> Result<Round> {
        Round::new(self.guesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{stats::Weights, words::word};

    fn vocabulary() -> Vec<Word> {
        ["CRANE", "SLATE", "TRACE", "GRAPE", "CRATE", "APPLE"].map(word).to_vec()
    }

    #[test]
    fn test_narrow_then_solve() -> Result<()> {
        let mut game = Game::new(&vocabulary(), 5);

        let outcome = game.apply_feedback(word("SLATE"), &Feedback::parse("  ...", 5)?);
        assert_eq!(outcome, Outcome::Narrowed);
        assert_eq!(game.words(), [word("CRATE")]);

        let outcome = game.apply_feedback(word("CRATE"), &Feedback::parse(".....", 5)?);
        assert_eq!(outcome, Outcome::Solved);

        let round = game.into_round()?;
        assert_eq!(round.guesses(), [word("SLATE"), word("CRATE")]);
        assert_eq!(round.answer(), &word("CRATE"));
        Ok(())
    }

    #[test]
    fn test_cancel_keeps_state() -> Result<()> {
        let mut game = Game::new(&vocabulary(), 5);
        let outcome = game.apply_feedback(word("SLATE"), &Feedback::parse(" - ..", 5)?);

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(game.words(), vocabulary());
        assert!(game.guesses().is_empty());
        assert!(game.into_round().is_err());
        Ok(())
    }

    #[test]
    fn test_solved_override() -> Result<()> {
        let mut game = Game::new(&vocabulary(), 5);
        let outcome = game.apply_feedback(word("GRAPE"), &Feedback::parse(" V+", 5)?);

        assert_eq!(outcome, Outcome::Solved);
        assert_eq!(game.guesses(), [word("GRAPE")]);
        Ok(())
    }

    #[test]
    fn test_suggestions() -> Result<()> {
        let history = History::parse("grape\napple\n");
        let scorer = Scorer::new(history.answers().collect(), Weights::default());
        let mut game = Game::new(&vocabulary(), 5);
        game.apply_feedback(word("BRAVE"), &Feedback::parse(" .. .", 5)?);

        let suggestions = game.suggestions(&history, &scorer, 1);
        assert_eq!(suggestions.unused, [word("CRANE"), word("TRACE"), word("CRATE")]);
        assert_eq!(suggestions.used, [word("GRAPE")]);
        assert_eq!(suggestions.recommended.len(), 1);
        // all three unused words score the same, so input order decides
        assert_eq!(suggestions.recommended[0].0, word("CRANE"));
        Ok(())
    }
}
