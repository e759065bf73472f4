//! YAML job files: parsing, resolution and execution.


use tabjoin_core::config::JoinConfig;
use tabjoin_core::join::{Cardinality, JoinKey, JoinType, Side};
use tabjoin_core::types::Scalar;
use tabjoin_exec::Engine;
use tabjoin_io::{read_table, Format};
use tabjoin_planner::{load_yaml_job, parse_yaml_job, resolve, JoinRequest, PlanError};
use test_data_gen::{path_in, scratch_dir, write_file};

fn job(body: &str) -> String {
    format!("left: a.csv\nright: b.jsonl\noutput: c.json\n{body}")
}

#[test]
fn test_cardinality_spellings() {
    for (text, want) in [
        ("1:1", Cardinality::OneToOne),
        ("1:many", Cardinality::OneToMany),
        ("1:m", Cardinality::OneToMany),
        ("many:1", Cardinality::ManyToOne),
        ("m:1", Cardinality::ManyToOne),
        ("many:many", Cardinality::ManyToMany),
        ("m:m", Cardinality::ManyToMany),
    ] {
        let j = parse_yaml_job(&job(&format!("left_key: id\ncardinality: \"{text}\"\n"))).unwrap();
        assert_eq!(j.request.cardinality, want, "{text}");
    }
}

#[test]
fn test_full_is_an_alias_for_outer() {
    let j = parse_yaml_job(&job("left_key: id\njoin: full\n")).unwrap();
    assert_eq!(j.request.join_type, JoinType::Outer);
}

#[test]
fn test_right_key_defaults_to_left_key() {
    let j = parse_yaml_job(&job("left_key: id\n")).unwrap();
    let (plan, _) = j.resolve(&JoinConfig::default()).unwrap();
    assert_eq!(plan.key, JoinKey::natural("id"));
    assert_eq!(plan.left.format, Format::Csv);
    assert_eq!(plan.right.format, Format::Jsonl);
    assert_eq!(plan.output.format, Format::Json);

    let j = parse_yaml_job(&job("left_key: id\nright_key: person_id\n")).unwrap();
    let (plan, _) = j.resolve(&JoinConfig::default()).unwrap();
    assert_eq!(plan.key, JoinKey::new("id", "person_id"));
}

#[test]
fn test_blank_keys_are_rejected() {
    let j = parse_yaml_job(&job("left_key: \"  \"\n")).unwrap();
    assert!(matches!(
        j.resolve(&JoinConfig::default()),
        Err(PlanError::MissingKey(Side::Left))
    ));

    let j = parse_yaml_job(&job("left_key: id\nright_key: \"\"\n")).unwrap();
    assert!(matches!(
        j.resolve(&JoinConfig::default()),
        Err(PlanError::MissingKey(Side::Right))
    ));
}

#[test]
fn test_missing_required_field_is_a_yaml_error() {
    let err = parse_yaml_job("left: a.csv\nright: b.csv\noutput: c.csv\n").unwrap_err();
    assert!(matches!(err, PlanError::Yaml(_)));
}

#[test]
fn test_cross_with_constraining_cardinality_is_rejected() {
    let j = parse_yaml_job(&job("left_key: id\njoin: cross\ncardinality: \"1:1\"\n")).unwrap();
    assert!(matches!(
        j.resolve(&JoinConfig::default()),
        Err(PlanError::Config(_))
    ));
}

#[test]
fn test_unwritable_output_is_rejected_at_plan_time() {
    let req = JoinRequest {
        left: "a.csv".into(),
        right: "b.csv".into(),
        left_key: "id".into(),
        right_key: None,
        join_type: JoinType::Inner,
        cardinality: Cardinality::ManyToMany,
        output: "out.xls".into(),
    };
    assert!(matches!(resolve(&req), Err(PlanError::Format(_))));
}

#[test]
fn test_config_section_overrides_base_config() {
    let base = JoinConfig {
        preview_rows: 50,
        ..JoinConfig::default()
    };
    let j = parse_yaml_job(&job(
        "left_key: id\nconfig:\n  suffixes: [\"_l\", \"_r\"]\n  indicator: true\n  csv_delimiter: \"\\\\t\"\n",
    ))
    .unwrap();
    let (_, cfg) = j.resolve(&base).unwrap();
    assert_eq!(cfg.left_suffix, "_l");
    assert_eq!(cfg.right_suffix, "_r");
    assert_eq!(cfg.indicator_column.as_deref(), Some("_merge"));
    assert_eq!(cfg.preview_rows, 50);
    assert_eq!(cfg.csv_delimiter, b'\t');
}

#[test]
fn test_plan_digest_is_stable() {
    let j = parse_yaml_job(&job("left_key: id\njoin: left\n")).unwrap();
    let (a, _) = j.resolve(&JoinConfig::default()).unwrap();
    let (b, _) = j.resolve(&JoinConfig::default()).unwrap();
    assert_eq!(a.digest().unwrap(), b.digest().unwrap());

    let other = parse_yaml_job(&job("left_key: id\njoin: right\n")).unwrap();
    let (c, _) = other.resolve(&JoinConfig::default()).unwrap();
    assert_ne!(a.digest().unwrap(), c.digest().unwrap());

    let text = a.explain().unwrap();
    assert!(text.contains("\"join_type\": \"left\""), "{text}");
}

#[test]
fn test_job_file_runs_end_to_end() {
    let dir = scratch_dir();
    let left = write_file(dir.path(), "people.csv", "id,name\n1,a\n2,b\n");
    let right = write_file(
        dir.path(),
        "scores.jsonl",
        "{\"person_id\":1,\"name\":\"x\"}\n{\"person_id\":1,\"name\":\"y\"}\n",
    );
    let output = path_in(dir.path(), "out/joined.csv");
    let job_path = write_file(
        dir.path(),
        "job.yaml",
        &format!(
            "left: {left}\nright: {right}\nleft_key: id\nright_key: person_id\n\
             join: outer\ncardinality: \"1:many\"\noutput: {output}\n\
             config:\n  suffixes: [\"_l\", \"_r\"]\n  indicator: source\n"
        ),
    );

    let j = load_yaml_job(&job_path).unwrap();
    let (plan, cfg) = j.resolve(&JoinConfig::default()).unwrap();
    let manifest = Engine::new(cfg).run(&plan).unwrap();
    assert_eq!(manifest.rows.output_rows, 3);
    assert_eq!(manifest.rows.both, 2);
    assert_eq!(manifest.rows.left_only, 1);

    let out = read_table(&output).unwrap();
    assert_eq!(
        out.column_names(),
        vec!["id", "name_l", "person_id", "name_r", "source"]
    );
    assert_eq!(
        out.column("source").unwrap().values,
        vec![
            Scalar::from("both"),
            Scalar::from("both"),
            Scalar::from("left_only")
        ]
    );
}
