use crate::{
    config::Settings,
    feedback::{Feedback, Mark},
    game::{Game, Outcome},
    history::{History, Round},
    stats::Scorer,
    vocabulary::Vocabulary,
    words::Word,
};
use color_eyre::Result;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use itertools::Itertools;
use rayon::prelude::*;
use std::{
    io::{self, Write},
    iter,
};

pub const MAX_GUESSES: usize = 20;

/// The solver playing against a known answer, always taking its first recommendation.
pub struct Simulation<'a> {
    answer: Word,
    history: &'a History,
    scorer: &'a Scorer,
    game: Game,
}

impl<'a> Simulation<'a> {
    pub fn new(answer: Word, vocabulary: &[Word], history: &'a History, scorer: &'a Scorer) -> Self {
        let game = Game::new(vocabulary, answer.len());
        Self {
            answer,
            history,
            scorer,
            game,
        }
    }

    pub fn run(&mut self) -> Vec<(Word, Feedback)> {
        iter::from_fn(|| {
            let guess = self.next_guess()?;
            let feedback = feedback_for(&guess, &self.answer);
            match self.game.apply_feedback(guess.clone(), &feedback) {
                Outcome::Cancelled => None,
                Outcome::Solved | Outcome::Narrowed => Some((guess, feedback)),
            }
        })
        .take_while_inclusive(|(_, feedback)| !feedback.is_solved())
        .take(MAX_GUESSES)
        .collect()
    }

    fn next_guess(&self) -> Option<Word> {
        let suggestions = self.game.suggestions(self.history, self.scorer, 1);
        suggestions
            .recommended
            .into_iter()
            .map(|(word, _)| word)
            .next()
            .or_else(|| suggestions.used.into_iter().next())
    }
}

/// Marks `guess` the way the game would against `answer`: hits first, then
/// presents while unmatched copies of the letter remain.
pub fn feedback_for(guess: &Word, answer: &Word) -> Feedback {
    let mut missing_letters = answer.letter_count();
    let mut marks = guess
        .iter()
        .zip(answer.iter())
        .map(|(guess, letter)| {
            if guess == letter {
                missing_letters[letter] -= 1;
                Mark::Hit
            } else {
                Mark::Absent
            }
        })
        .collect_vec();
    marks.iter_mut().zip(guess.iter()).for_each(|(mark, letter)| {
        if *mark == Mark::Absent && missing_letters[letter] > 0 {
            missing_letters[letter] -= 1;
            *mark = Mark::Present;
        }
    });
    Feedback::normalized(marks, guess.len())
}

/// Result of replaying many answers.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub solved: History,
    pub failed: Vec<Word>,
}

pub fn simulate_all(answers: &[Word], vocabulary: &[Word], history: &History, scorer: &Scorer) -> Report {
    let progress = ProgressBar::new(answers.len() as u64).with_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let games: Vec<(Word, Vec<(Word, Feedback)>)> = answers
        .par_iter()
        .progress_with(progress)
        .map(|answer| {
            let mut simulation = Simulation::new(answer.clone(), vocabulary, history, scorer);
            let guesses = simulation.run();
            (answer.clone(), guesses)
        })
        .collect();

    let mut report = Report::default();
    for (answer, guesses) in games {
        let solved = guesses.last().is_some_and(|(_, feedback)| feedback.is_solved());
        if !solved {
            log::info!("could not solve {answer} in {} guesses", guesses.len());
            report.failed.push(answer);
            continue;
        }
        match Round::new(guesses.into_iter().map(|(word, _)| word).collect()) {
            Ok(round) => report.solved.push(round),
            Err(err) => log::warn!("discarding simulated round for {answer}: {err}"),
        }
    }
    report
}

/// Replays the last `limit` answers of `history` (all of them by default) and prints the results.
pub fn run(settings: &Settings, vocabulary: &Vocabulary, history: &History, limit: Option<usize>) -> Result<()> {
    let scorer = Scorer::new(history.answers().collect(), settings.weights);
    let answers: Vec<Word> = history
        .answers()
        .filter(|answer| answer.len() == settings.word_length)
        .cloned()
        .collect();
    let skip = limit.map_or(0, |limit| answers.len().saturating_sub(limit));
    let answers = &answers[skip..];
    log::info!("simulating {} answers", answers.len());

    let report = simulate_all(answers, vocabulary.words(), history, &scorer);

    let mut out = io::stdout().lock();
    writeln!(out, "Solved {} of {} answers", report.solved.len(), answers.len())?;
    if !report.failed.is_empty() {
        writeln!(out, "Not solved: {}", report.failed.iter().format(" "))?;
    }
    let chart = report.solved.tries_chart();
    writeln!(out, "{}:", chart.title())?;
    for line in chart.lines(settings.line_length.saturating_sub(9)) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{stats::Weights, words::word};

    #[test]
    fn test_feedback_for() {
        let cases = [
            ("CRANE", "CRANE", "....."),
            ("SPEED", "STEEP", ".V.. "),
            ("ALLEY", "SLANT", "V.   "),
            ("ALLEY", "LLAMA", "V.V  "),
            ("EERIE", "THEME", "V   ."),
            ("GEESE", "EERIE", " .V ."),
        ];
        for (guess, answer, expected) in cases {
            assert_eq!(
                feedback_for(&word(guess), &word(answer)).to_string(),
                expected,
                "{guess} against {answer}"
            );
        }
    }

    fn setup() -> (Vec<Word>, History, Scorer) {
        let vocabulary = ["CRANE", "SLATE", "TRACE", "GRAPE", "CRATE", "APPLE", "STEEP", "SPEED"]
            .map(word)
            .to_vec();
        let history = History::parse("crane grape\nslate steep\n");
        let scorer = Scorer::new(history.answers().collect(), Weights::default());
        (vocabulary, history, scorer)
    }

    #[test]
    fn test_run_solves() {
        let (vocabulary, history, scorer) = setup();
        for answer in &vocabulary {
            let mut simulation = Simulation::new(answer.clone(), &vocabulary, &history, &scorer);
            let guesses = simulation.run();

            let (last, feedback) = guesses.last().expect("at least one guess");
            assert!(feedback.is_solved());
            assert_eq!(last, answer);
            assert!(guesses.len() <= vocabulary.len());
        }
    }

    #[test]
    fn test_unknown_answer() {
        let (vocabulary, history, scorer) = setup();
        let mut simulation = Simulation::new(word("ZEBRA"), &vocabulary, &history, &scorer);
        let guesses = simulation.run();

        assert!(guesses.iter().all(|(_, feedback)| !feedback.is_solved()));
        assert!(guesses.len() < MAX_GUESSES);
    }

    #[test]
    fn test_simulate_all() {
        let (vocabulary, history, scorer) = setup();
        let answers = [word("GRAPE"), word("STEEP"), word("ZEBRA")];
        let report = simulate_all(&answers, &vocabulary, &history, &scorer);

        assert_eq!(report.failed, [word("ZEBRA")]);
        assert_eq!(report.solved.len(), 2);
        let answers: Vec<_> = report.solved.answers().cloned().collect();
        assert_eq!(answers, [word("GRAPE"), word("STEEP")]);
    }
}
