use crate::words::Word;
use color_eyre::{
    eyre::{ensure, WrapErr},
    Result,
};
use itertools::Itertools;
use std::{collections::HashSet, fs, io, path::Path};

/// Separator between the label and the guesses of a legacy history line.
const LEGACY_SEPARATOR: char = '—';

/// Rounds taking longer than this are left out of the chart buckets.
pub const CHART_BUCKETS: usize = 12;

/// The guesses of one finished round; the last one is the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round(Vec<Word>);

impl Round {
    pub fn new(guesses: Vec<Word>) -> Result<Self> {
        ensure!(!guesses.is_empty(), "a round needs at least one guess");
        Ok(Self(guesses))
    }

    pub fn answer(&self) -> &Word {
        &self.0[self.0.len() - 1]
    }

    pub fn guesses(&self) -> &[Word] {
        &self.0
    }

    fn parse(words: Vec<&str>) -> Result<Self> {
        Self::new(words.into_iter().map(Word::try_from).collect::<Result<_>>()?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    rounds: Vec<Round>,
}

impl History {
    /// Reads `current`, falling back to the `legacy` format, then to nothing.
    pub fn load(current: &Path, legacy: &Path) -> Result<Self> {
        if let Some(text) = read_optional(current)? {
            let history = Self::parse(&text);
            log::info!("loaded {} rounds from {}", history.len(), current.display());
            return Ok(history);
        }
        if let Some(text) = read_optional(legacy)? {
            let history = Self::parse_legacy(&text);
            log::info!("loaded {} legacy rounds from {}", history.len(), legacy.display());
            return Ok(history);
        }
        log::warn!(
            "neither {} nor {} found, starting without history",
            current.display(),
            legacy.display()
        );
        Ok(Self::default())
    }

    /// One round per line, guesses separated by whitespace.
    pub fn parse(text: &str) -> Self {
        Self::parse_lines(text.lines().map(|line| line.split_whitespace().collect()).collect())
    }

    /// Lines of the form `label — GUESS*GUESS*ANSWER`.
    pub fn parse_legacy(text: &str) -> Self {
        Self::parse_lines(text.lines().map(|line| {
            line.split_once(LEGACY_SEPARATOR)
                .map(|(_, guesses)| {
                    guesses
                        .split(|ch: char| ch == '*' || ch.is_whitespace())
                        .filter(|w| !w.is_empty())
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect())
    }

    fn parse_lines(lines: Vec<Vec<&str>>) -> Self {
        let mut rounds = Vec::new();
        for (number, words) in lines.into_iter().enumerate() {
            if words.is_empty() {
                continue;
            }
            match Round::parse(words) {
                Ok(round) => rounds.push(round),
                Err(err) => log::warn!("skipping history line {}: {err}", number + 1),
            }
        }
        Self { rounds }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_text()).wrap_err_with(|| format!("failed to write {}", path.display()))?;
        log::info!("saved {} rounds to {}", self.len(), path.display());
        Ok(())
    }

    fn to_text(&self) -> String {
        self.rounds
            .iter()
            .map(|round| format!("{}\n", round.guesses().iter().format(" ")))
            .collect()
    }

    pub fn push(&mut self, round: Round) {
        self.rounds.push(round);
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn answers(&self) -> impl Iterator<Item = &Word> {
        self.rounds.iter().map(Round::answer)
    }

    /// Splits candidates into never-used and previously-used answers, keeping their order.
    pub fn partition(&self, candidates: &[Word]) -> (Vec<Word>, Vec<Word>) {
        let used: HashSet<&Word> = self.answers().collect();
        candidates.iter().cloned().partition(|word| !used.contains(word))
    }

    pub fn tries_chart(&self) -> TriesChart {
        let mut buckets = [0u32; CHART_BUCKETS];
        for round in self.rounds() {
            if let Some(bucket) = buckets.get_mut(round.guesses().len() - 1) {
                *bucket += 1;
            }
        }
        let total: usize = self.rounds.iter().map(|r| r.guesses().len()).sum();
        let mean = (!self.rounds.is_empty()).then(|| total as f64 / self.rounds.len() as f64);
        TriesChart {
            buckets,
            mean,
            rounds: self.rounds.len(),
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).wrap_err_with(|| format!("failed to read {}", path.display())),
    }
}

/// How many rounds were won in each number of guesses.
#[derive(Debug, Clone, PartialEq)]
pub struct TriesChart {
    pub buckets: [u32; CHART_BUCKETS],
    pub mean: Option<f64>,
    pub rounds: usize,
}

impl TriesChart {
    pub fn title(&self) -> String {
        match self.mean {
            Some(mean) => format!("Win tries chart (mean: {mean:.3} after {} games)", self.rounds),
            None => "Win tries chart (no games yet)".to_string(),
        }
    }

    /// One line per bucket, bars scaled so the largest fills `width`.
    pub fn lines(&self, width: usize) -> Vec<String> {
        let max = self.buckets.iter().copied().max().unwrap_or(0);
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let bar = if max == 0 {
                    0
                } else {
                    (count as usize * width) / max as usize
                };
                format!("{:2} ({count:3}) {}", i + 1, "=".repeat(bar))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::word;
    use std::{env, path::PathBuf, process};

    #[test]
    fn test_parse() {
        let history = History::parse("crane slate  apple\n\ngrape\nbad 1word\nSTEEP speed\n");

        assert_eq!(history.len(), 3);
        let answers: Vec<_> = history.answers().map(|w| w.to_string()).collect();
        assert_eq!(answers, ["APPLE", "GRAPE", "SPEED"]);
        assert_eq!(history.rounds()[0].guesses().len(), 3);
    }

    #[test]
    fn test_parse_legacy() {
        let history = History::parse_legacy("Wordle 201 — crane*slate*APPLE\nno separator\n#202 —  grape\n");

        let answers: Vec<_> = history.answers().map(|w| w.to_string()).collect();
        assert_eq!(answers, ["APPLE", "GRAPE"]);
        assert_eq!(history.rounds()[0].guesses().len(), 3);
    }

    #[test]
    fn test_to_text() {
        let history = History::parse("crane apple\ngrape\n");
        assert_eq!(history.to_text(), "CRANE APPLE\nGRAPE\n");
        assert_eq!(History::parse(&history.to_text()), history);
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("wrdl-assist-{name}-{}", process::id()));
        let _unused = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_fallbacks() -> Result<()> {
        let dir = scratch_dir("history-load");
        let current = dir.join("WORDLEs.txt");
        let legacy = dir.join("Previous WORDLEs.txt");

        assert_eq!(History::load(&current, &legacy)?, History::default());

        fs::write(&legacy, "Wordle 1 — crane*APPLE
Wordle 2 — grape
")?;
        let history = History::load(&current, &legacy)?;
        let answers: Vec<_> = history.answers().map(|w| w.to_string()).collect();
        assert_eq!(answers, ["APPLE", "GRAPE"]);

        fs::write(&current, "slate steep
")?;
        let history = History::load(&current, &legacy)?;
        let answers: Vec<_> = history.answers().map(|w| w.to_string()).collect();
        assert_eq!(answers, ["STEEP"]);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let dir = scratch_dir("history-save");
        let current = dir.join("WORDLEs.txt");
        let legacy = dir.join("missing.txt");

        let mut history = History::parse_legacy("Wordle 1 — crane*APPLE
");
        history.push(Round::new(vec![word("SLATE"), word("GRAPE")])?);
        history.save(&current)?;

        assert_eq!(fs::read_to_string(&current)?, "CRANE APPLE
SLATE GRAPE
");
        assert_eq!(History::load(&current, &legacy)?, history);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_empty_round_rejected() {
        assert!(Round::new(Vec::new()).is_err());
    }

    #[test]
    fn test_partition() {
        let history = History::parse("crane apple\ngrape\n");
        let candidates = [word("SLATE"), word("GRAPE"), word("TRACE"), word("APPLE"), word("CRANE")];
        let (unused, used) = history.partition(&candidates);

        assert_eq!(unused, [word("SLATE"), word("TRACE"), word("CRANE")]);
        assert_eq!(used, [word("GRAPE"), word("APPLE")]);
    }

    #[test]
    fn test_tries_chart() {
        let history = History::parse("a b c\nd e c\nf\nq r s t u v w x y z a b c\n");
        let chart = history.tries_chart();

        assert_eq!(chart.buckets[0], 1);
        assert_eq!(chart.buckets[2], 2);
        assert_eq!(chart.buckets.iter().sum::<u32>(), 3);
        assert_eq!(chart.mean, Some(20.0 / 4.0));
        assert_eq!(chart.title(), "Win tries chart (mean: 5.000 after 4 games)");

        let lines = chart.lines(10);
        assert_eq!(lines.len(), CHART_BUCKETS);
        assert_eq!(lines[0], " 1 (  1) =====");
        assert_eq!(lines[2], " 3 (  2) ==========");
        assert_eq!(lines[11], "12 (  0) ");
    }

    #[test]
    fn test_empty_chart() {
        let chart = History::default().tries_chart();
        assert_eq!(chart.mean, None);
        assert!(chart.lines(80).iter().all(|line| line.ends_with("(  0) ")));
    }
}
