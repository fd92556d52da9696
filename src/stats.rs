use crate::words::{LetterMap, Word};
use std::cmp::Ordering;

/// Multipliers and penalties used by [`Scorer::score`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub letter: f64,
    pub first: f64,
    pub last: f64,
    pub plural_penalty: f64,
    pub duplicate_penalty: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            letter: 10.0,
            first: 20.0,
            last: 15.0,
            plural_penalty: 1.0,
            duplicate_penalty: 0.5,
        }
    }
}

/// Letter probabilities observed in past answers.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct FrequencyModel {
    letter: LetterMap<f64>,
    first: LetterMap<f64>,
    last: LetterMap<f64>,
}

impl FrequencyModel {
    pub fn letter(&self) -> &LetterMap<f64> {
        &self.letter
    }

    pub fn first(&self) -> &LetterMap<f64> {
        &self.first
    }

    pub fn last(&self) -> &LetterMap<f64> {
        &self.last
    }
}

impl<'a> FromIterator<&'a Word> for FrequencyModel {
    fn from_iter<T: IntoIterator<Item = &'a Word>>(iter: T) -> Self {
        let mut model = Self::default();
        let mut total_words = 0u32;
        let mut total_letters = 0u32;
        for word in iter {
            total_words += 1;
            model.first[word.first()] += 1.0;
            model.last[word.last()] += 1.0;
            for letter in word.iter() {
                model.letter[letter] += 1.0;
                total_letters += 1;
            }
        }
        // an empty history leaves every probability at zero
        if total_words > 0 {
            let words = f64::from(total_words);
            let letters = f64::from(total_letters);
            model.first.values_mut().for_each(|p| *p /= words);
            model.last.values_mut().for_each(|p| *p /= words);
            model.letter.values_mut().for_each(|p| *p /= letters);
        }
        model
    }
}

/// Ranks candidates by how much they look like a typical answer.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    model: FrequencyModel,
    weights: Weights,
}

impl Scorer {
    pub fn new(model: FrequencyModel, weights: Weights) -> Self {
        Self { model, weights }
    }

    pub fn score(&self, word: &Word) -> f64 {
        let Self { model, weights } = self;
        let mut score = model.first()[word.first()] * weights.first + model.last()[word.last()] * weights.last;
        score += word.iter().map(|letter| model.letter()[letter] * weights.letter).sum::<f64>();
        // plurals and past tenses are rarely answers
        if word.ends_with("S") || word.ends_with("ED") {
            score -= weights.plural_penalty;
        }
        let repeated = word.letter_count().iter().filter(|(_, &count)| count > 1).count();
        score - weights.duplicate_penalty * repeated as f64
    }

    /// Highest score first; equal scores keep their input order.
    pub fn rank(&self, candidates: &[Word]) -> Vec<(Word, f64)> {
        let mut scored: Vec<_> = candidates.iter().map(|w| (w.clone(), self.score(w))).collect();
        scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::{word, Letter};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_model() {
        let history = [word("APPLE"), word("GRAPE")];
        let model: FrequencyModel = history.iter().collect();

        assert!(approx(model.first()[Letter::new('A')], 0.5));
        assert!(approx(model.first()[Letter::new('G')], 0.5));
        assert!(approx(model.last()[Letter::new('E')], 1.0));
        assert!(approx(model.letter()[Letter::new('P')], 0.3));
        assert!(approx(model.letter()[Letter::new('Z')], 0.0));
        let total: f64 = model.letter().iter().map(|(_, p)| p).sum();
        assert!(approx(total, 1.0));
    }

    #[test]
    fn test_empty_history() {
        let scorer = Scorer::new(FrequencyModel::from_iter(&[]), Weights::default());
        assert!(approx(scorer.score(&word("CRANE")), 0.0));
        assert!(approx(scorer.score(&word("BIKES")), -1.0));
        assert!(approx(scorer.score(&word("SPEED")), -1.0 - 0.5));
        assert!(approx(scorer.score(&word("EERIE")), -0.5));
    }

    #[test]
    fn test_first_letter_contribution() {
        let history = [word("APPLE"), word("GRAPE")];
        let scorer = Scorer::new(history.iter().collect(), Weights::default());
        // same letters, different first letter
        assert!(scorer.score(&word("GRAPE")) > scorer.score(&word("RGAPE")));

        let weights = Weights {
            letter: 0.0,
            last: 0.0,
            ..Default::default()
        };
        let scorer = Scorer::new(history.iter().collect(), weights);
        assert!(approx(scorer.score(&word("GRAPE")), 10.0));
        assert!(approx(scorer.score(&word("ZEBRA")), 0.0));
    }

    #[test]
    fn test_score() {
        let history = [word("APPLE"), word("GRAPE")];
        let scorer = Scorer::new(history.iter().collect(), Weights::default());
        // first A 0.5*20, last E 1.0*15, letters (0.2+0.3+0.3+0.1+0.2)*10, one repeated letter
        assert!(approx(scorer.score(&word("APPLE")), 10.0 + 15.0 + 11.0 - 0.5));
    }

    #[test]
    fn test_duplicate_penalty_per_distinct_letter() {
        let scorer = Scorer::default();
        assert!(approx(scorer.score(&word("EERIE")), -0.5));
        assert!(approx(scorer.score(&word("ABBAC")), -1.0));
        assert!(approx(scorer.score(&word("AAAAC")), -0.5));
    }

    #[test]
    fn test_rank() {
        let history = [word("APPLE"), word("GRAPE"), word("CRANE")];
        let scorer = Scorer::new(history.iter().collect(), Weights::default());
        let candidates = [word("ZZZZZ"), word("CRATE"), word("QQQQQ"), word("GRAPE"), word("JJJJJ")];
        let ranked = scorer.rank(&candidates);

        assert_eq!(ranked.len(), candidates.len());
        assert!(ranked.windows(2).all(|pair| pair[0].1 >= pair[1].1));
        // equal scores keep their input order
        let tail: Vec<_> = ranked[2..].iter().map(|(w, _)| w.to_string()).collect();
        assert_eq!(tail, ["ZZZZZ", "QQQQQ", "JJJJJ"]);
        assert_eq!(scorer.rank(&candidates), ranked);
    }
}
