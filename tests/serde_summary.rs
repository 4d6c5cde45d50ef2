//! JSON round-trip of the serialisable report types.
//!
//! Run with: `cargo test --features serde`

#[cfg(feature = "serde")]
mod tests {
    use std::path::Path;

    use class_transitions::{run, RunConfig, Subject, SubjectSummary, TransitionMatrix};

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn demo_report() -> class_transitions::SurveyReport {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("data");
        run(&RunConfig::in_dir(&dir)).unwrap()
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_summary_round_trip() {
        let report = demo_report();
        let summary = &report.subject(Subject::Math).unwrap().summary;

        let json = serde_json::to_string(summary).unwrap();
        let restored: SubjectSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(&restored, summary);
    }

    #[test]
    fn test_matrix_round_trip() {
        let report = demo_report();
        let matrix = &report.subject(Subject::Science).unwrap().matrix;

        let json = serde_json::to_string(matrix).unwrap();
        let restored: TransitionMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(&restored, matrix);
        assert_eq!(restored.classes(), matrix.classes());
    }

    #[test]
    fn test_subject_serialises_by_name() {
        let json = serde_json::to_string(&Subject::Science).unwrap();
        assert_eq!(json, "\"Science\"");
    }
}
