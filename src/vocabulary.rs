use crate::words::Word;
use color_eyre::{eyre::WrapErr, Result};
use std::{collections::HashSet, fs, io, path::Path};

/// Every word the player may guess, in file order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<Word>,
    index: HashSet<Word>,
}

impl Vocabulary {
    pub fn load(path: &Path, word_length: usize) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                let vocabulary = Self::parse(&text, word_length);
                log::info!("loaded {} words from {}", vocabulary.len(), path.display());
                Ok(vocabulary)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("vocabulary file {} not found, starting without words", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err).wrap_err_with(|| format!("failed to read {}", path.display())),
        }
    }

    pub fn parse(text: &str, word_length: usize) -> Self {
        let mut vocabulary = Self::default();
        for line in text.lines().map(str::trim) {
            if line.chars().count() != word_length {
                continue;
            }
            match Word::try_from(line) {
                Ok(word) => {
                    if vocabulary.index.insert(word.clone()) {
                        vocabulary.words.push(word);
                    }
                }
                Err(err) => log::debug!("skipping {line:?}: {err}"),
            }
        }
        vocabulary
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.index.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::word;

    #[test]
    fn test_parse() {
        let vocabulary = Vocabulary::parse("crane\n  Slate \nAPPLES\nab-cd\n\nTRACE\ncrane\nit\n", 5);
        let words: Vec<_> = vocabulary.words().iter().map(|w| w.to_string()).collect();

        assert_eq!(words, ["CRANE", "SLATE", "TRACE"]);
        assert!(vocabulary.contains(&word("SLATE")));
        assert!(!vocabulary.contains(&word("APPLES")));
    }

    #[test]
    fn test_other_length() {
        let vocabulary = Vocabulary::parse("crane\nit\nat\n", 2);
        assert_eq!(vocabulary.len(), 2);
    }

    #[test]
    fn test_missing_file() -> Result<()> {
        let vocabulary = Vocabulary::load(Path::new("this/file/does/not/exist.txt"), 5)?;
        assert_eq!(vocabulary.len(), 0);
        Ok(())
    }
}
