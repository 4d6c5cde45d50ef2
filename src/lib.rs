//! # class-transitions
//!
//! Course-to-course transition matrices and honors mobility rates from a
//! student enrollment survey.
//!
//! ---
//!
//! Each respondent reports the math and science classes they took last year,
//! are taking now, and plan to take next year. Answers are free text, so they
//! are normalized through a synonym mapping first. From the normalized rows
//! the crate produces, per subject:
//!
//! - a **transition matrix**: how often students move from class A to class B
//!   across adjacent years, row-normalized by how often A appeared as a source;
//! - **mobility rates**: the fraction of year-to-year transitions that move a
//!   student from regular to honors level and back, plus the honors retention
//!   rate derived from them.
//!
//! ## The pipeline
//!
//! ```text
//! survey.csv ─► SynonymMap ─► SurveyRow ─┬─► TransitionCounts ─► TransitionMatrix ─► <subject>_matrix.csv
//!                                        │          ▲
//!                                        │   ClassVocabulary
//!                                        │          ▼
//!                                        └─► MobilityCounts ───► MobilityRates ────► console summary
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`synonyms`] | [`SynonymMap`] | `raw => canonical` mapping for free-text answers |
//! | [`survey`] | [`SurveyRow`], [`Column`], [`Subject`] | Fixed column layout and the row parser |
//! | [`vocabulary`] | [`ClassVocabulary`] | Ordered class universe with honors flags |
//! | [`accumulator`] | [`TransitionCounts`] | Raw class → class counts and row denominators |
//! | [`transition`] | [`TransitionMatrix`] | Row-normalized probabilities |
//! | [`mobility`] | [`MobilityCounts`], [`MobilityRates`] | Regular ↔ honors classification |
//! | [`report`] | [`SubjectSummary`] | Matrix CSV reading/writing and summaries |
//! | [`pipeline`] | [`SurveyReport`] | Whole-run orchestration over a [`RunConfig`] |
//! | [`logging`] | | `tracing` subscriber setup for the CLI |
//!
//! ## Example
//!
//! ```rust
//! use class_transitions::{
//!     compute_matrix, convert_to_probability, parse_rows, ClassVocabulary, Subject, SynonymMap,
//! };
//!
//! let synonyms = SynonymMap::parse("Bio Hon => AP Biology", "mapping").unwrap();
//! let vocab = ClassVocabulary::parse("Biology\nHon | AP Biology", "science", &["Hon".to_string()])
//!     .unwrap();
//! let raw = vec![
//!     vec!["Timestamp", "Grade", "Cur", "Prev", "Next", "CurM", "PrevM", "NextM"],
//!     vec!["t", "11", "Bio Hon", "Biology", "", "", "", ""],
//! ];
//! let rows = parse_rows(&raw, &synonyms, "ignore").unwrap();
//! let counts = compute_matrix(&rows, &vocab, Subject::Science.columns());
//! let matrix = convert_to_probability(&counts);
//! assert_eq!(matrix.get("Biology", "AP Biology"), Some(1.0));
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`TransitionMatrix`],
//!   [`MobilityCounts`], [`MobilityRates`], [`SubjectSummary`] and [`Subject`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod accumulator;
pub mod config;
pub mod error;
pub mod logging;
pub mod mobility;
pub mod pipeline;
pub mod report;
pub mod survey;
pub mod synonyms;
pub mod transition;
pub mod vocabulary;

pub use accumulator::{compute_matrix, TransitionCounts};
pub use config::RunConfig;
pub use error::{ConfigError, SurveyError};
pub use mobility::{calculate_reg_honors, count_mobility, MobilityCounts, MobilityRates};
pub use pipeline::{run, write_outputs, SubjectReport, SurveyReport};
pub use report::{read_matrix, write_matrix, SubjectSummary};
pub use survey::{parse_rows, Column, Subject, SurveyRow};
pub use synonyms::SynonymMap;
pub use transition::{convert_to_probability, TransitionMatrix};
pub use vocabulary::ClassVocabulary;
