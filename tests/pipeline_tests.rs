//! End-to-end tests over the sample survey in `demos/data`.
//!
//! Inputs are read straight from the demo directory; every test writes its
//! outputs into its own temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use class_transitions::report::read_matrix_file;
use class_transitions::{run, write_outputs, RunConfig, Subject, SurveyError};

// ── Helpers ────────────────────────────────────────────────────────────────────

fn demo_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("data")
}

fn demo_config(out: &Path) -> RunConfig {
    RunConfig {
        output_dir: out.to_path_buf(),
        ..RunConfig::in_dir(&demo_dir())
    }
}

/// Copy the demo inputs into `dir` so a test can corrupt one of them.
fn copy_demo_inputs(dir: &Path) -> RunConfig {
    for name in ["responses.csv", "mapping.txt", "math_classes.txt", "science_classes.txt"] {
        fs::copy(demo_dir().join(name), dir.join(name)).unwrap();
    }
    RunConfig::in_dir(dir)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

// ── Full run ───────────────────────────────────────────────────────────────────

#[test]
fn test_science_matrix_and_mobility() {
    let out = tempfile::tempdir().unwrap();
    let report = run(&demo_config(out.path())).unwrap();
    assert_eq!(report.respondents, 3);

    let science = report.subject(Subject::Science).unwrap();
    assert_eq!(science.counts.count("Biology"), Some(3));
    assert_eq!(science.counts.get("Biology", "Chemistry"), Some(2));
    assert_close(science.matrix.get("Biology", "Chemistry").unwrap(), 2.0 / 3.0);
    assert_close(science.matrix.get("Biology", "Chemistry Honors").unwrap(), 1.0 / 3.0);
    assert_close(science.matrix.get("Chemistry", "AP Biology").unwrap(), 1.0);
    assert_close(science.matrix.get("No class at Gunn", "Biology").unwrap(), 1.0);

    let m = science.summary.mobility;
    assert_eq!((m.reg_to_honors, m.honors_to_reg, m.total), (2, 0, 5));
    assert_close(science.summary.rates.reg_to_honors, 0.4);
    assert_close(science.summary.rates.honors_retained, 1.0);
}

#[test]
fn test_math_matrix_and_mobility() {
    let out = tempfile::tempdir().unwrap();
    let report = run(&demo_config(out.path())).unwrap();

    let math = report.subject(Subject::Math).unwrap();
    assert_eq!(math.counts.count("Algebra 2"), Some(3));
    for to in ["Precalculus", "Precalculus Honors", "Algebra 2 Honors"] {
        assert_close(math.matrix.get("Algebra 2", to).unwrap(), 1.0 / 3.0);
    }
    // Precalculus Honors is a current class with no next class: counted, no outgoing mass.
    assert_eq!(math.counts.count("Precalculus Honors"), Some(1));
    let row = math
        .matrix
        .rows()
        .find(|(c, _)| *c == "Precalculus Honors")
        .map(|(_, r)| r.to_vec())
        .unwrap();
    assert!(row.iter().all(|&v| v == 0.0));

    let r = math.summary.rates;
    assert_close(r.reg_to_honors, 0.4);
    assert_close(r.honors_to_reg, 0.2);
    assert_close(r.honors_retained, 0.8);
}

#[test]
fn test_subjects_processed_science_first() {
    let out = tempfile::tempdir().unwrap();
    let report = run(&demo_config(out.path())).unwrap();
    let order: Vec<Subject> = report.subjects.iter().map(|s| s.subject()).collect();
    assert_eq!(order, [Subject::Science, Subject::Math]);
}

#[test]
fn test_outputs_written_and_readable() {
    let out = tempfile::tempdir().unwrap();
    let config = demo_config(out.path());
    let report = run(&config).unwrap();
    let written = write_outputs(&report, &config).unwrap();

    assert_eq!(
        written,
        [
            out.path().join("science_matrix.csv"),
            out.path().join("math_matrix.csv"),
        ]
    );
    let science = read_matrix_file(&written[0]).unwrap();
    assert_eq!(science, report.subject(Subject::Science).unwrap().matrix);
    let names: Vec<&str> = science.classes().iter().map(String::as_str).collect();
    assert_eq!(
        names,
        ["Biology", "AP Biology", "Chemistry", "Chemistry Honors", "No class at Gunn"]
    );
}

#[test]
fn test_raw_counts_written_when_enabled() {
    let out = tempfile::tempdir().unwrap();
    let config = RunConfig {
        write_raw_counts: true,
        ..demo_config(out.path())
    };
    let report = run(&config).unwrap();
    write_outputs(&report, &config).unwrap();

    let text = fs::read_to_string(out.path().join("math_counts.csv")).unwrap();
    let first = text.lines().next().unwrap();
    assert!(first.ends_with(",count"), "{first}");
}

#[test]
fn test_missing_output_dir_is_created() {
    let out = tempfile::tempdir().unwrap();
    let nested = out.path().join("reports").join("2024");
    let config = demo_config(&nested);
    let report = run(&config).unwrap();
    write_outputs(&report, &config).unwrap();
    assert!(nested.join("math_matrix.csv").exists());
}

// ── Failures ───────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_class_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = copy_demo_inputs(dir.path());
    let mut survey = fs::read_to_string(&config.survey_path).unwrap();
    survey.push_str("2024-05-02 09:00,12,Astronomy,Biology,,Algebra 2,Algebra 2,\n");
    fs::write(&config.survey_path, survey).unwrap();

    let err = run(&config).unwrap_err();
    match err {
        SurveyError::UnknownClass { subject, class } => {
            assert_eq!(subject, Subject::Science);
            assert_eq!(class, "Astronomy");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("science_matrix.csv").exists());
}

#[test]
fn test_malformed_mapping_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = copy_demo_inputs(dir.path());
    fs::write(&config.mapping_path, "Bio Hon -> AP Biology\n").unwrap();

    let err = run(&config).unwrap_err();
    assert!(matches!(err, SurveyError::Config(_)), "{err}");
}

#[test]
fn test_short_survey_row_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = copy_demo_inputs(dir.path());
    let mut survey = fs::read_to_string(&config.survey_path).unwrap();
    survey.push_str("2024-05-02 09:00,12,Biology\n");
    fs::write(&config.survey_path, survey).unwrap();

    let err = run(&config).unwrap_err();
    assert!(
        matches!(err, SurveyError::RowLength { row: 4, expected: 8, found: 3 }),
        "{err}"
    );
}

#[test]
fn test_missing_input_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::in_dir(dir.path());
    let err = run(&config).unwrap_err();
    match err {
        SurveyError::Io { path, .. } => assert_eq!(path, dir.path().join("mapping.txt")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_all_transitions_excluded_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = copy_demo_inputs(dir.path());
    fs::write(
        &config.survey_path,
        "h1,h2,h3,h4,h5,h6,h7,h8\n\
         t,9,No class at Gunn,Biology,Biology,Algebra 2,Algebra 2,Precalculus\n",
    )
    .unwrap();

    let err = run(&config).unwrap_err();
    assert!(
        matches!(err, SurveyError::NoEligibleTransitions { subject: Subject::Science }),
        "{err}"
    );
}

#[test]
fn test_missing_survey_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = copy_demo_inputs(dir.path());
    fs::remove_file(&config.survey_path).unwrap();

    let err = run(&config).unwrap_err();
    match err {
        SurveyError::Io { path, .. } => assert_eq!(path, config.survey_path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_failed_write_leaves_no_outputs() {
    let out = tempfile::tempdir().unwrap();
    let config = demo_config(out.path());
    let report = run(&config).unwrap();
    // A directory squatting on the math staging path makes the second write fail.
    fs::create_dir(out.path().join(".math_matrix.csv.tmp")).unwrap();

    let err = write_outputs(&report, &config).unwrap_err();
    assert!(matches!(err, SurveyError::Io { .. }), "{err}");
    assert!(!out.path().join("science_matrix.csv").exists());
    assert!(!out.path().join(".science_matrix.csv.tmp").exists());
    assert!(!out.path().join("math_matrix.csv").exists());
}
