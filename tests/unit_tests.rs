use fixture_forge::{parse_assignment, run_generate, run_validate, GenerateArgs, ValidateArgs};
use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCHEMA: &str = r#"
version: 1
records:
  - name: posts
    fields:
      - name: id
        type: big_int
        generator:
          type: sequential
          start: 1
      - name: title
        type:
          type: var_char
          length: 32
        generator:
          type: pattern
          pattern: "Post #{next}"
      - name: status
        type: text
        generator:
          type: static
          value: open
      - name: author_id
        type: int
      - name: published_at
        type: timestamp_tz
        nullable: true
        generator:
          type: timestamp_sequence
          start: "2024-01-01T00:00:00Z"
          interval_secs: 3600
    traits:
      draft:
        set:
          status: draft
        zero: [published_at]
"#;

fn write_schema(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("fixtures.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

fn generate_args(schema: PathBuf, output: PathBuf) -> GenerateArgs {
    GenerateArgs {
        schema,
        record: "posts".to_string(),
        count: 3,
        traits: Vec::new(),
        set: Vec::new(),
        zero: Vec::new(),
        output,
        append: false,
        reset_after: false,
    }
}

fn read_lines(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_parse_assignment() {
    let (field, value) = parse_assignment("author_id=7").unwrap();
    assert_eq!(field, "author_id");
    assert_eq!(value, serde_yaml::from_str::<YamlValue>("7").unwrap());

    let (_, quoted) = parse_assignment("title=\"7\"").unwrap();
    assert_eq!(quoted, YamlValue::String("7".to_string()));

    let (_, with_equals) = parse_assignment("title=a=b").unwrap();
    assert_eq!(with_equals, YamlValue::String("a=b".to_string()));

    assert!(parse_assignment("author_id").is_err());
    assert!(parse_assignment("=7").is_err());
}

#[test]
fn test_generate_writes_jsonl() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), SCHEMA);
    let output = dir.path().join("posts.jsonl");

    let summary = run_generate(&generate_args(schema, output.clone())).unwrap();
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.sequence_index, 3);

    let rows = read_lines(&output);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[2]["id"], 3);
    assert_eq!(rows[1]["title"], "Post #2");
    assert_eq!(rows[0]["status"], "open");
    assert_eq!(rows[1]["published_at"], "2024-01-01T01:00:00+00:00");
}

#[test]
fn test_generate_with_layers() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), SCHEMA);
    let output = dir.path().join("posts.jsonl");

    let mut args = generate_args(schema, output.clone());
    args.traits = vec!["draft".to_string()];
    args.set = vec!["author_id=7".to_string(), "title=Pinned".to_string()];
    args.zero = vec!["status".to_string()];
    args.reset_after = true;

    let summary = run_generate(&args).unwrap();
    assert_eq!(summary.sequence_index, 0);

    for row in read_lines(&output) {
        assert_eq!(row["author_id"], 7);
        assert_eq!(row["title"], "Pinned");
        assert_eq!(row["status"], "");
        assert!(row["published_at"].is_null());
    }
}

#[test]
fn test_generate_append() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), SCHEMA);
    let output = dir.path().join("posts.jsonl");

    run_generate(&generate_args(schema.clone(), output.clone())).unwrap();
    let mut args = generate_args(schema, output.clone());
    args.append = true;
    run_generate(&args).unwrap();

    let rows = read_lines(&output);
    assert_eq!(rows.len(), 6);
    // Each run starts a fresh factory.
    assert_eq!(rows[3]["id"], 1);
}

#[test]
fn test_generate_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), SCHEMA);
    let output = dir.path().join("posts.jsonl");

    let mut unknown_trait = generate_args(schema.clone(), output.clone());
    unknown_trait.traits = vec!["archived".to_string()];
    assert!(run_generate(&unknown_trait).is_err());

    let mut unknown_field = generate_args(schema.clone(), output.clone());
    unknown_field.set = vec!["views=3".to_string()];
    assert!(run_generate(&unknown_field).is_err());

    let mut unknown_zero = generate_args(schema.clone(), output.clone());
    unknown_zero.zero = vec!["views".to_string()];
    let err = run_generate(&unknown_zero).unwrap_err();
    assert!(format!("{err:#}").contains("views"));

    let mut unknown_record = generate_args(schema, output);
    unknown_record.record = "comments".to_string();
    assert!(run_generate(&unknown_record).is_err());
}

#[test]
fn test_validate_reports_records() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), SCHEMA);

    let reports = run_validate(&ValidateArgs { schema }).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].name, "posts");
    assert_eq!(reports[0].fields, 5);
    assert_eq!(reports[0].traits, vec!["draft".to_string()]);
}

#[test]
fn test_validate_rejects_bad_generator() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        dir.path(),
        r#"
records:
  - name: tags
    fields:
      - name: label
        type: text
        generator:
          type: sequential
"#,
    );

    let err = run_validate(&ValidateArgs { schema }).unwrap_err();
    assert!(format!("{err:#}").contains("label"));
}
