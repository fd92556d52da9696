use crate::stats::Weights;
use clap::{Parser, Subcommand};
use color_eyre::{eyre::WrapErr, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Setup file with `name = value` lines
    #[arg(short, long, value_name = "FILE", default_value = "setup.txt")]
    pub setup: PathBuf,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Suggest words while you play (default)
    #[default]
    Play,
    /// Let the solver play every past answer and chart how it does
    Simulate {
        /// Only replay the most recent answers
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Letter counts per word are kept in a `u8`.
pub const MAX_WORD_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub previous_file: PathBuf,
    pub current_file: PathBuf,
    pub vocabulary_file: PathBuf,
    pub line_length: usize,
    pub word_length: usize,
    pub recommended: usize,
    pub weights: Weights,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            previous_file: "Previous WORDLEs.txt".into(),
            current_file: "WORDLEs.txt".into(),
            vocabulary_file: "Scrabble Words.txt".into(),
            line_length: 80,
            word_length: 5,
            recommended: 20,
            weights: Weights::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("setup file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err).wrap_err_with(|| format!("failed to read {}", path.display())),
        }
    }

    /// Applies every recognized `name = value` line on top of the defaults.
    pub fn parse(text: &str) -> Self {
        let mut settings = Self::default();
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                log::warn!("invalid line in setup file: {line:?}");
                continue;
            };
            settings.apply(&name.trim().to_uppercase(), value.trim());
        }
        if !(1..=MAX_WORD_LENGTH).contains(&settings.word_length) {
            log::warn!("word length must be between 1 and {MAX_WORD_LENGTH}, keeping the default");
            settings.word_length = Self::default().word_length;
        }
        settings
    }

    fn apply(&mut self, name: &str, value: &str) {
        match name {
            "PREVIOUS" => self.previous_file = value.into(),
            "CURRENT" => self.current_file = value.into(),
            "VOCABULARY" => self.vocabulary_file = value.into(),
            "LINE LENGTH" => set_number(&mut self.line_length, name, value),
            "WORD LENGTH" => set_number(&mut self.word_length, name, value),
            "RECOMMENDED" => set_number(&mut self.recommended, name, value),
            "LETTER MULTIPLIER" => set_weight(&mut self.weights.letter, name, value),
            "FIRST MULTIPLIER" => set_weight(&mut self.weights.first, name, value),
            "LAST MULTIPLIER" => set_weight(&mut self.weights.last, name, value),
            "PLURAL PENALTY" => set_weight(&mut self.weights.plural_penalty, name, value),
            "DUPLICATE PENALTY" => set_weight(&mut self.weights.duplicate_penalty, name, value),
            _ => log::debug!("ignoring unknown setup entry {name:?}"),
        }
    }
}

fn set_number<T: FromStr>(target: &mut T, name: &str, value: &str) {
    match value.parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => log::warn!("invalid value {value:?} for {name:?}, keeping the default"),
    }
}

fn set_weight(target: &mut f64, name: &str, value: &str) {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => *target = parsed,
        _ => log::warn!("invalid value {value:?} for {name:?}, keeping the default"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse("");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.word_length, 5);
        assert_eq!(settings.weights.first, 20.0);
    }

    #[test]
    fn test_parse() {
        let settings = Settings::parse(
            "# my setup\n\
             vocabulary = words.txt   # trailing comment\n\
             Current=history.txt\n\
             \n\
             LETTER multiplier = 12\n\
             last multiplier = 7.5\n\
             word length = 6\n\
             recommended = 0\n\
             line length = wide\n\
             this line is not a setting\n\
             favourite colour = blue\n",
        );

        assert_eq!(settings.vocabulary_file, PathBuf::from("words.txt"));
        assert_eq!(settings.current_file, PathBuf::from("history.txt"));
        assert_eq!(settings.previous_file, Settings::default().previous_file);
        assert_eq!(settings.weights.letter, 12.0);
        assert_eq!(settings.weights.last, 7.5);
        assert_eq!(settings.word_length, 6);
        assert_eq!(settings.line_length, 80);
        assert_eq!(settings.recommended, 0);
    }

    #[test]
    fn test_word_length_bounds() {
        assert_eq!(Settings::parse("word length = 0").word_length, 5);
        assert_eq!(Settings::parse("word length = 300").word_length, 5);
        assert_eq!(Settings::parse("word length = 32").word_length, MAX_WORD_LENGTH);
    }

    #[test]
    fn test_non_finite_weights() {
        let settings = Settings::parse(
            "letter multiplier = inf\n\
             first multiplier = NaN\n\
             last multiplier = -infinity\n\
             duplicate penalty = 0.25\n",
        );
        let defaults = Weights::default();
        assert_eq!(settings.weights.letter, defaults.letter);
        assert_eq!(settings.weights.first, defaults.first);
        assert_eq!(settings.weights.last, defaults.last);
        assert_eq!(settings.weights.duplicate_penalty, 0.25);
    }

    #[test]
    fn test_missing_file() -> Result<()> {
        let settings = Settings::load(Path::new("this/file/does/not/exist.txt"))?;
        assert_eq!(settings, Settings::default());
        Ok(())
    }

    #[test]
    fn test_cli() {
        let cli = Cli::parse_from(["wrdl-assist", "--setup", "mine.txt", "simulate", "--limit", "10"]);
        assert_eq!(cli.setup, PathBuf::from("mine.txt"));
        assert_eq!(cli.command, Some(Command::Simulate { limit: Some(10) }));

        let cli = Cli::parse_from(["wrdl-assist"]);
        assert_eq!(cli.setup, PathBuf::from("setup.txt"));
        assert_eq!(cli.command, None);
    }
}
