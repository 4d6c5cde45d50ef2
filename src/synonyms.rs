//! Synonym normalizer for free-text survey answers.
//!
//! The mapping source is line oriented, one `raw => canonical` pair per line:
//!
//! ```text
//! Bio Hon   => AP Biology
//! chem      => Chemistry
//! dont know => ignore
//! ```
//!
//! Both sides are trimmed. Blank lines and lines starting with `#` are
//! skipped, as are lines with a blank raw side (` => ignore`): blank answer
//! pieces never reach a lookup. Lookups are exact; a token with no entry passes through unchanged.
//! When a raw value appears twice the later line wins.

use std::path::Path;

use hashbrown::HashMap;

use crate::error::{ConfigError, SurveyError};

/// Separator between the raw and canonical halves of a mapping line.
pub const MAPPING_SEPARATOR: &str = "=>";

/// Raw answer → canonical class name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SynonymMap {
    entries: HashMap<String, String>,
}

impl SynonymMap {
    /// An empty mapping; every token normalizes to itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from in-memory pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse mapping text. `source_name` is only used in error messages.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingSeparator`] for a line without `=>`, and
    /// [`ConfigError::EmptyField`] when the canonical side is blank.
    pub fn parse(text: &str, source_name: &str) -> Result<Self, ConfigError> {
        let mut entries = HashMap::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (raw, canonical) =
                line.split_once(MAPPING_SEPARATOR)
                    .ok_or_else(|| ConfigError::MissingSeparator {
                        source_name: source_name.to_owned(),
                        line: i + 1,
                        separator: MAPPING_SEPARATOR,
                        content: line.to_owned(),
                    })?;
            let (raw, canonical) = (raw.trim(), canonical.trim());
            if canonical.is_empty() {
                return Err(ConfigError::EmptyField {
                    source_name: source_name.to_owned(),
                    line: i + 1,
                    content: line.to_owned(),
                });
            }
            if raw.is_empty() {
                tracing::debug!(line = i + 1, canonical, "blank raw answer, mapping skipped");
                continue;
            }
            if let Some(previous) = entries.insert(raw.to_owned(), canonical.to_owned()) {
                tracing::debug!(raw, previous = %previous, canonical, "synonym redefined");
            }
        }
        Ok(Self { entries })
    }

    /// Read and parse a mapping file.
    pub fn load(path: &Path) -> Result<Self, SurveyError> {
        let text = std::fs::read_to_string(path).map_err(|e| SurveyError::io(path, e))?;
        let map = Self::parse(&text, &path.display().to_string())?;
        tracing::info!(path = %path.display(), entries = map.len(), "loaded synonym mapping");
        Ok(map)
    }

    /// Canonical value for `token`, or the trimmed token itself if unmapped.
    pub fn normalize<'a>(&'a self, token: &'a str) -> &'a str {
        let token = token.trim();
        self.entries.get(token).map_or(token, String::as_str)
    }

    /// Number of mapping entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_token_is_rewritten() {
        let map = SynonymMap::parse("Bio Hon => AP Biology", "mapping.txt").unwrap();
        assert_eq!(map.normalize("Bio Hon"), "AP Biology");
    }

    #[test]
    fn test_unmapped_token_passes_through() {
        let map = SynonymMap::parse("Bio Hon => AP Biology", "mapping.txt").unwrap();
        assert_eq!(map.normalize("Physics"), "Physics");
    }

    #[test]
    fn test_lookup_trims_but_is_otherwise_exact() {
        let map = SynonymMap::parse("  Bio Hon   =>   AP Biology  ", "mapping.txt").unwrap();
        assert_eq!(map.normalize("  Bio Hon "), "AP Biology");
        assert_eq!(map.normalize("bio hon"), "bio hon");
        assert_eq!(map.normalize("Bio  Hon"), "Bio  Hon");
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let map = SynonymMap::parse("\n# comment\nchem => Chemistry\n\n", "mapping.txt").unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_missing_separator_reports_line() {
        let err = SynonymMap::parse("chem => Chemistry\nphys = Physics", "mapping.txt").unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingSeparator {
                source_name: "mapping.txt".into(),
                line: 2,
                separator: MAPPING_SEPARATOR,
                content: "phys = Physics".into(),
            }
        );
    }

    #[test]
    fn test_blank_canonical_rejected() {
        let err = SynonymMap::parse("chem =>", "mapping.txt").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyField { line: 1, .. }));
    }

    #[test]
    fn test_blank_raw_side_is_skipped() {
        let map = SynonymMap::parse("Bio Hon => AP Biology\n => ignore\n", "mapping.txt").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.normalize("Bio Hon"), "AP Biology");
        assert_eq!(map.normalize(""), "");
    }

    #[test]
    fn test_later_entry_wins() {
        let map = SynonymMap::parse("chem => Chem\nchem => Chemistry", "m").unwrap();
        assert_eq!(map.normalize("chem"), "Chemistry");
    }

    #[test]
    fn test_mapping_is_not_transitive() {
        let map = SynonymMap::from_pairs([("a", "b"), ("b", "c")]);
        assert_eq!(map.normalize("a"), "b");
    }
}
