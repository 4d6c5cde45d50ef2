//! Class vocabulary: the fixed, ordered universe of class names for one subject.
//!
//! Every transition matrix is square over a vocabulary, and its row/column
//! order is the order classes appear in the class list. The same list carries
//! the honors flag used by [`crate::mobility`].
//!
//! # Class list format
//!
//! One class per line, either bare or prefixed with a level marker:
//!
//! ```text
//! Biology
//! Hon | Chemistry Honors
//! Reg | Physics
//! ```
//!
//! A class is honors when its level matches one of the configured honors
//! markers (case-insensitive, default `Hon`). Bare names and any other level
//! are regular. Blank lines and `#` comments are skipped.

use std::path::Path;

use hashbrown::HashMap;

use crate::error::{ConfigError, SurveyError};

/// Separator between the level marker and the class name.
pub const LEVEL_SEPARATOR: char = '|';

/// Level marker that flags a class as honors unless configured otherwise.
pub const DEFAULT_HONORS_MARKER: &str = "Hon";

/// One class in a vocabulary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassEntry {
    /// Canonical class name.
    pub name: String,
    /// `true` for honors / advanced level.
    pub honors: bool,
}

/// Ordered class universe with O(1) name → position lookup.
#[derive(Clone, Debug, Default)]
pub struct ClassVocabulary {
    entries: Vec<ClassEntry>,
    index: HashMap<String, usize>,
}

impl ClassVocabulary {
    /// Build a vocabulary from `(name, honors)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateClass`] if a name repeats.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let mut vocab = Self::default();
        for (name, honors) in entries {
            vocab.push(name.into(), honors, "<memory>")?;
        }
        Ok(vocab)
    }

    /// Parse a class list. `source_name` is only used in error messages.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyField`] for `Hon |` or `| Name` lines, and
    /// [`ConfigError::DuplicateClass`] if a name repeats.
    pub fn parse(
        text: &str,
        source_name: &str,
        honors_markers: &[String],
    ) -> Result<Self, ConfigError> {
        let mut vocab = Self::default();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (name, honors) = match line.split_once(LEVEL_SEPARATOR) {
                Some((level, name)) => {
                    let (level, name) = (level.trim(), name.trim());
                    if level.is_empty() || name.is_empty() {
                        return Err(ConfigError::EmptyField {
                            source_name: source_name.to_owned(),
                            line: i + 1,
                            content: line.to_owned(),
                        });
                    }
                    let honors = honors_markers
                        .iter()
                        .any(|m| m.trim().eq_ignore_ascii_case(level));
                    (name, honors)
                }
                None => (line, false),
            };
            vocab.push(name.to_owned(), honors, source_name)?;
        }
        Ok(vocab)
    }

    /// Read and parse a class list file.
    pub fn load(path: &Path, honors_markers: &[String]) -> Result<Self, SurveyError> {
        let text = std::fs::read_to_string(path).map_err(|e| SurveyError::io(path, e))?;
        let vocab = Self::parse(&text, &path.display().to_string(), honors_markers)?;
        tracing::info!(
            path = %path.display(),
            classes = vocab.len(),
            honors = vocab.honors_count(),
            "loaded class list"
        );
        Ok(vocab)
    }

    fn push(&mut self, name: String, honors: bool, source_name: &str) -> Result<(), ConfigError> {
        if self.index.contains_key(&name) {
            return Err(ConfigError::DuplicateClass {
                source_name: source_name.to_owned(),
                class: name,
            });
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(ClassEntry { name, honors });
        Ok(())
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the vocabulary has no classes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `name` in the vocabulary, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Honors flag for `name`, or `None` if the class is unknown.
    pub fn is_honors(&self, name: &str) -> Option<bool> {
        self.index_of(name).map(|i| self.entries[i].honors)
    }

    /// Class names in vocabulary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// All entries in vocabulary order.
    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    /// Number of honors classes.
    pub fn honors_count(&self) -> usize {
        self.entries.iter().filter(|e| e.honors).count()
    }
}
