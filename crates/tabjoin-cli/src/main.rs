//! tabjoin CLI: join two tables from csv, xls/xlsx, json or jsonl files.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tabjoin_core::config::{parse_delimiter, JoinConfig};
use tabjoin_core::join::{Cardinality, JoinKey, JoinType};
use tabjoin_core::manifest::RunManifest;
use tabjoin_core::types::Table;
use tabjoin_exec::{write_manifest, Engine};
use tabjoin_planner::{load_yaml_job, resolve, JoinPlan, JoinRequest};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tabjoin")]
#[command(about = "A small command line tool to join two tables", long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors and skip the preview
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join two files
    Join(JoinArgs),

    /// Execute a join described by a YAML job file
    Run {
        /// Path to the job YAML file
        #[arg(long)]
        job: PathBuf,

        /// Write the run manifest (JSON) to this path
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Rows of the key columns to print after the join
        #[arg(long)]
        preview: Option<usize>,
    },

    /// Parse and resolve a job file without reading any data
    Validate {
        /// Path to the job YAML file
        #[arg(long)]
        job: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct JoinArgs {
    /// Left table to join
    left: String,

    /// Right table to join
    right: String,

    /// Left field to join on
    #[arg(short = 'l', long)]
    left_key: String,

    /// Right field to join on (leave empty for natural join)
    #[arg(short = 'r', long)]
    right_key: Option<String>,

    /// SQL equivalent join method: inner, left, right, outer, cross
    #[arg(short = 'j', long = "join", default_value = "inner", value_parser = parse_join_type)]
    join_type: JoinType,

    /// Expected key multiplicity: 1:1, 1:m, m:1, m:m
    #[arg(short = 'c', long, default_value = "many:many", value_parser = parse_cardinality)]
    cardinality: Cardinality,

    /// Output file
    #[arg(short = 'o', long)]
    output: String,

    /// Suffixes for overlapping column names, as LEFT,RIGHT
    #[arg(long, value_parser = parse_suffixes)]
    suffixes: Option<(String, String)>,

    /// Name of the provenance column
    #[arg(long, conflicts_with = "no_indicator")]
    indicator: Option<String>,

    /// Leave the provenance column out of the output
    #[arg(long)]
    no_indicator: bool,

    /// Field delimiter for .csv input and output
    #[arg(long)]
    delimiter: Option<String>,

    /// Write the run manifest (JSON) to this path
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Rows of the key columns to print after the join
    #[arg(long)]
    preview: Option<usize>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let quiet = cli.quiet;

    let result = match cli.command {
        Commands::Join(args) => join_files(&args, quiet),
        Commands::Run {
            job,
            manifest,
            preview,
        } => run_job(&job, manifest, preview, quiet),
        Commands::Validate { job } => validate_job(&job),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn join_files(args: &JoinArgs, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = JoinConfig::from_env();
    apply_join_flags(&mut config, args)?;

    let request = JoinRequest {
        left: args.left.clone(),
        right: args.right.clone(),
        left_key: args.left_key.clone(),
        right_key: args.right_key.clone(),
        join_type: args.join_type,
        cardinality: args.cardinality,
        output: args.output.clone(),
    };
    let plan = resolve(&request)?;
    execute(&plan, config, args.manifest.as_ref(), quiet)
}

fn run_job(
    job_path: &PathBuf,
    manifest: Option<PathBuf>,
    preview: Option<usize>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let job = load_yaml_job(job_path)?;
    let (plan, mut config) = job.resolve(&JoinConfig::from_env())?;
    if let Some(n) = preview {
        config.preview_rows = n;
    }
    execute(&plan, config, manifest.as_ref(), quiet)
}

fn validate_job(job_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let job = load_yaml_job(job_path)?;
    let (plan, _) = job.resolve(&JoinConfig::from_env())?;
    println!("{}", plan.explain()?);
    println!("✓ Job is valid");
    Ok(())
}

fn execute(
    plan: &JoinPlan,
    config: JoinConfig,
    manifest_path: Option<&PathBuf>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let preview_rows = config.preview_rows;
    let suffixes = (config.left_suffix.clone(), config.right_suffix.clone());
    if !quiet {
        print!("{}", describe(plan));
    }
    debug!(
        left = %plan.left.path,
        right = %plan.right.path,
        key = %plan.key,
        join = %plan.join_type,
        cardinality = %plan.cardinality,
        output = %plan.output.path,
        "resolved join"
    );

    let engine = Engine::new(config);
    let (table, manifest) = engine.execute(plan)?;

    if let Some(path) = manifest_path {
        write_manifest(&manifest, path)?;
    }
    if !quiet {
        let columns = preview_columns(&table, &plan.key, &suffixes);
        print!("{}", render_preview(&table, &columns, preview_rows));
        println!("{}", summary_line(&manifest, &plan.output.path));
    }
    Ok(())
}

fn apply_join_flags(cfg: &mut JoinConfig, args: &JoinArgs) -> Result<(), String> {
    if let Some((l, r)) = &args.suffixes {
        cfg.left_suffix = l.clone();
        cfg.right_suffix = r.clone();
    }
    if let Some(name) = &args.indicator {
        cfg.indicator_column = Some(name.clone());
    }
    if args.no_indicator {
        cfg.indicator_column = None;
    }
    if let Some(d) = &args.delimiter {
        cfg.csv_delimiter = parse_delimiter(d).map_err(|e| e.to_string())?;
    }
    if let Some(n) = args.preview {
        cfg.preview_rows = n;
    }
    Ok(())
}

fn parse_join_type(s: &str) -> Result<JoinType, String> {
    s.parse().map_err(|e: tabjoin_core::error::Error| e.to_string())
}

fn parse_cardinality(s: &str) -> Result<Cardinality, String> {
    s.parse().map_err(|e: tabjoin_core::error::Error| e.to_string())
}

fn parse_suffixes(s: &str) -> Result<(String, String), String> {
    match s.split_once(',') {
        Some((l, r)) if !r.contains(',') => Ok((l.to_string(), r.to_string())),
        _ => Err(format!("expected LEFT,RIGHT (e.g. _x,_y), got '{s}'")),
    }
}

/// Resolved arguments as a tab-aligned DESCRIPTION block.
fn describe(plan: &JoinPlan) -> String {
    let mut out = String::from("DESCRIPTION\n");
    let rows = [
        ("left", plan.left.path.as_str()),
        ("right", plan.right.path.as_str()),
        ("left_key", plan.key.left.as_str()),
        ("right_key", plan.key.right.as_str()),
        ("join", plan.join_type.as_str()),
        ("cardinality", plan.cardinality.as_str()),
        ("output", plan.output.path.as_str()),
    ];
    for (k, v) in rows {
        let _ = writeln!(out, "\t{k:<11}\t{v}");
    }
    out
}

/// Output names of the key columns, accounting for coalescing and suffixes.
fn preview_columns(table: &Table, key: &JoinKey, suffixes: &(String, String)) -> Vec<String> {
    let candidates = [
        [key.left.clone(), format!("{}{}", key.left, suffixes.0)],
        [key.right.clone(), format!("{}{}", key.right, suffixes.1)],
    ];
    let mut out: Vec<String> = Vec::with_capacity(2);
    for pair in candidates {
        if let Some(name) = pair.into_iter().find(|n| table.column(n).is_some()) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
    }
    out
}

/// Fixed-width text rendering of the first `n` rows of `columns`.
fn render_preview(table: &Table, columns: &[String], n: usize) -> String {
    let rows = table.num_rows().min(n);
    let cols: Vec<_> = columns.iter().filter_map(|c| table.column(c)).collect();
    if cols.is_empty() || n == 0 {
        return String::new();
    }

    let cells: Vec<Vec<String>> = cols
        .iter()
        .map(|c| {
            c.values[..rows]
                .iter()
                .map(|v| if v.is_missing() { "null".to_string() } else { v.to_string() })
                .collect()
        })
        .collect();
    let index_width = rows.saturating_sub(1).to_string().len();
    let widths: Vec<usize> = cols
        .iter()
        .zip(&cells)
        .map(|(c, vals)| {
            vals.iter()
                .map(String::len)
                .chain(std::iter::once(c.name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:index_width$}", "");
    for (c, &w) in cols.iter().zip(&widths) {
        let _ = write!(out, "  {:>w$}", c.name);
    }
    out.push('\n');
    for r in 0..rows {
        let _ = write!(out, "{r:<index_width$}");
        for (vals, &w) in cells.iter().zip(&widths) {
            let _ = write!(out, "  {:>w$}", vals[r]);
        }
        out.push('\n');
    }
    out
}

fn summary_line(manifest: &RunManifest, output: &str) -> String {
    let r = &manifest.rows;
    format!(
        "✓ Wrote {} rows to {} (both={}, left_only={}, right_only={}) in {}ms",
        r.output_rows,
        output,
        r.both,
        r.left_only,
        r.right_only,
        manifest.duration_ms()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tabjoin_core::types::Scalar;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    fn parse_join(argv: &[&str]) -> JoinArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Join(args) => args,
            _ => panic!("expected join subcommand"),
        }
    }

    #[test]
    fn join_flags_match_the_classic_interface() {
        let args = parse_join(&[
            "tabjoin", "join", "a.csv", "b.xlsx", "-l", "id", "-j", "left", "-c", "m:1", "-o",
            "out.csv",
        ]);
        assert_eq!(args.left_key, "id");
        assert_eq!(args.right_key, None);
        assert_eq!(args.join_type, JoinType::Left);
        assert_eq!(args.cardinality, Cardinality::ManyToOne);
    }

    #[test]
    fn defaults_are_inner_and_many_to_many() {
        let args = parse_join(&["tabjoin", "join", "a.csv", "b.csv", "-l", "k", "-o", "o.csv"]);
        assert_eq!(args.join_type, JoinType::Inner);
        assert_eq!(args.cardinality, Cardinality::ManyToMany);
    }

    #[test]
    fn bad_enum_values_are_rejected_by_the_parser() {
        assert!(Cli::try_parse_from([
            "tabjoin", "join", "a.csv", "b.csv", "-l", "k", "-o", "o.csv", "-j", "sideways"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "tabjoin", "join", "a.csv", "b.csv", "-l", "k", "-o", "o.csv", "-c", "2:2"
        ])
        .is_err());
    }

    #[test]
    fn flags_override_config() {
        let args = parse_join(&[
            "tabjoin",
            "join",
            "a.csv",
            "b.csv",
            "-l",
            "k",
            "-o",
            "o.csv",
            "--suffixes",
            "_left,_right",
            "--no-indicator",
            "--delimiter",
            ";",
            "--preview",
            "3",
        ]);
        let mut cfg = JoinConfig::default();
        apply_join_flags(&mut cfg, &args).unwrap();
        assert_eq!(cfg.left_suffix, "_left");
        assert_eq!(cfg.right_suffix, "_right");
        assert_eq!(cfg.indicator_column, None);
        assert_eq!(cfg.csv_delimiter, b';');
        assert_eq!(cfg.preview_rows, 3);
    }

    #[test]
    fn suffixes_need_exactly_two_parts() {
        assert_eq!(
            parse_suffixes("_a,_b").unwrap(),
            ("_a".to_string(), "_b".to_string())
        );
        assert!(parse_suffixes("_a").is_err());
        assert!(parse_suffixes("_a,_b,_c").is_err());
    }

    #[test]
    fn preview_finds_coalesced_and_suffixed_keys() {
        let natural = Table::from_rows(&["id", "v"], vec![vec![Scalar::I64(1), Scalar::I64(2)]])
            .unwrap();
        let sfx = ("_x".to_string(), "_y".to_string());
        assert_eq!(
            preview_columns(&natural, &JoinKey::natural("id"), &sfx),
            vec!["id"]
        );

        let crossed = Table::from_rows(&["id_x", "id_y"], vec![vec![Scalar::I64(1), Scalar::I64(2)]])
            .unwrap();
        assert_eq!(
            preview_columns(&crossed, &JoinKey::natural("id"), &sfx),
            vec!["id_x", "id_y"]
        );
    }

    #[test]
    fn preview_is_limited_and_aligned() {
        let t = Table::from_rows(
            &["id"],
            (0..8).map(|i| vec![Scalar::I64(i)]).collect(),
        )
        .unwrap();
        let text = render_preview(&t, &["id".to_string()], 5);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "   id");
        assert_eq!(lines[1], "0   0");
        assert!(render_preview(&t, &["id".to_string()], 0).is_empty());
    }

    #[test]
    fn describe_lists_resolved_keys() {
        let plan = resolve(&JoinRequest {
            left: "a.csv".into(),
            right: "b.csv".into(),
            left_key: "id".into(),
            right_key: None,
            join_type: JoinType::Left,
            cardinality: Cardinality::ManyToOne,
            output: "o.csv".into(),
        })
        .unwrap();
        let text = describe(&plan);
        assert!(text.starts_with("DESCRIPTION\n"));
        assert!(text.contains("\tright_key  \tid\n"));
        assert!(text.contains("many:1"));
    }
}
