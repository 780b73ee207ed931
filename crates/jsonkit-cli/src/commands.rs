use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use jsonkit_diff::{
    annotate_node, annotated_lines, Annotations, ChangeKind, DiffNode, PathAnnotationMap, Side,
    ViewLine,
};
use jsonkit_jwt::{
    decode, timestamp_status, with_formatted_timestamps, DecodedJwt, TimestampStatus,
};
use jsonkit_params::{encode_value, extract_query_from_url, is_serializable_for_url, ParsedUrl};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(&cli)?;
    if !config.color {
        colored::control::set_override(false);
    }
    debug!(?config, "resolved output config");

    match cli.command {
        Command::Annotate(args) => cmd_annotate(args, &config),
        Command::Params(args) => match args.action {
            ParamsAction::Decode { input } => cmd_params_decode(&input, &config),
            ParamsAction::Encode { json } => cmd_params_encode(&json, &config),
        },
        Command::Jwt(args) => cmd_jwt(&args.token, &config, Utc::now()),
    }
}

fn cmd_annotate(args: AnnotateArgs, config: &CliConfig) -> anyhow::Result<()> {
    print!("{}", annotate_output(&args, config)?);
    Ok(())
}

fn annotate_output(args: &AnnotateArgs, config: &CliConfig) -> anyhow::Result<String> {
    let text = read_source(&args.diff)?;
    let node = DiffNode::from_json_str(&text)
        .with_context(|| format!("loading diff tree {}", args.diff))?;
    let annotations = annotate_node(&node);
    debug!(
        additions = annotations.additions(),
        deletions = annotations.deletions(),
        updates = annotations.updates(),
        "annotated diff tree"
    );

    let documents = match (&args.left, &args.right) {
        (Some(left), Some(right)) => Some((read_json_file(left)?, read_json_file(right)?)),
        (None, None) => None,
        _ => anyhow::bail!("--left and --right must be given together"),
    };

    match config.format {
        OutputFormat::Json => {
            let output = match &documents {
                Some((left, right)) => json!({
                    "left": annotations.left,
                    "right": annotations.right,
                    "left_view": annotated_lines(left, &annotations.left),
                    "right_view": annotated_lines(right, &annotations.right),
                }),
                None => serde_json::to_value(&annotations)?,
            };
            Ok(format!("{}\n", to_json(&output, config.indent)?))
        }
        OutputFormat::Text => {
            let mut out = render_annotations(&annotations);
            if let Some((left, right)) = &documents {
                let left_lines = annotated_lines(left, &annotations.left);
                let right_lines = annotated_lines(right, &annotations.right);
                out.push('\n');
                out.push_str(&render_view("left", &left_lines, config.indent));
                out.push('\n');
                out.push_str(&render_view("right", &right_lines, config.indent));
            }
            Ok(out)
        }
    }
}

fn cmd_params_decode(input: &str, config: &CliConfig) -> anyhow::Result<()> {
    let parsed = extract_query_from_url(input);
    match config.format {
        OutputFormat::Json => println!("{}", to_json(&parsed, config.indent)?),
        OutputFormat::Text => print!("{}", render_parsed_url(&parsed, config.indent)?),
    }
    Ok(())
}

fn cmd_params_encode(source: &str, config: &CliConfig) -> anyhow::Result<()> {
    let text = match source.strip_prefix('@') {
        Some(path) => read_source(path)?,
        None => source.to_string(),
    };
    let value: Value = serde_json::from_str(&text).context("parsing JSON object")?;
    if !is_serializable_for_url(&value) {
        warn!("object contains null values; they are encoded as the text \"null\"");
    }
    let query = encode_value(&value)?;

    match config.format {
        OutputFormat::Json => {
            let output = json!({ "query_string": query });
            println!("{}", to_json(&output, config.indent)?);
        }
        OutputFormat::Text => println!("{query}"),
    }
    Ok(())
}

fn cmd_jwt(token: &str, config: &CliConfig, now: DateTime<Utc>) -> anyhow::Result<()> {
    let jwt = decode(token).context("decoding token")?;
    let status = timestamp_status(&jwt.payload, now);

    match config.format {
        OutputFormat::Json => {
            let output = json!({
                "header": jwt.header,
                "payload": with_formatted_timestamps(&jwt.payload),
                "signature": jwt.raw_signature,
                "status": status,
            });
            println!("{}", to_json(&output, config.indent)?);
        }
        OutputFormat::Text => print!("{}", render_jwt(&jwt, &status, config.indent)?),
    }
    Ok(())
}

/// Read a file, or stdin for `-`.
fn read_source(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    fs::read_to_string(source).with_context(|| format!("reading {source}"))
}

fn read_json_file(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn to_json<T: Serialize>(value: &T, indent: usize) -> anyhow::Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }
    let spaces = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(spaces.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(out)?)
}

fn symbol(kind: ChangeKind) -> ColoredString {
    match kind {
        ChangeKind::Add => "+".green().bold(),
        ChangeKind::Delete => "-".red().bold(),
        ChangeKind::Update => "~".yellow().bold(),
    }
}

fn styled(text: &str, kind: Option<ChangeKind>) -> ColoredString {
    match kind {
        Some(ChangeKind::Add) => text.green(),
        Some(ChangeKind::Delete) => text.red(),
        Some(ChangeKind::Update) => text.yellow(),
        None => text.normal(),
    }
}

/// jq-style: `.` is the root, every other path gets a leading dot.
fn display_path(path: &str) -> String {
    format!(".{path}")
}

fn render_side(out: &mut String, side: Side, map: &PathAnnotationMap) {
    let title = match side {
        Side::Left => "left",
        Side::Right => "right",
    };
    out.push_str(&format!("{} ({})\n", title.bold(), map.len()));
    if map.is_empty() {
        out.push_str(&format!("  {}\n", "no changes".dimmed()));
    }
    for (path, kind) in map.iter() {
        out.push_str(&format!(
            "  {} {}  {}\n",
            symbol(kind),
            styled(&display_path(path), Some(kind)),
            kind.to_string().dimmed()
        ));
    }
}

fn render_annotations(annotations: &Annotations) -> String {
    let mut out = String::new();
    if annotations.is_empty() {
        out.push_str(&format!("{} No differences.\n", "✓".green().bold()));
        return out;
    }
    for side in [Side::Left, Side::Right] {
        render_side(&mut out, side, annotations.side(side));
    }
    out.push_str(&format!(
        "{} added, {} deleted, {} updated\n",
        annotations.additions().to_string().green(),
        annotations.deletions().to_string().red(),
        annotations.updates().to_string().yellow(),
    ));
    out
}

fn render_view(title: &str, lines: &[ViewLine], indent: usize) -> String {
    let mut out = format!("{}\n", title.bold());
    for line in lines {
        let marker = match line.kind {
            Some(kind) => symbol(kind),
            None => " ".normal(),
        };
        let padding = " ".repeat(line.depth * indent);
        out.push_str(&format!("{} {}{}\n", marker, padding, styled(&line.label, line.kind)));
    }
    out
}

fn render_parsed_url(parsed: &ParsedUrl, indent: usize) -> anyhow::Result<String> {
    let mut out = String::new();
    out.push_str(&format!("Base URL: {}\n", parsed.base_url.cyan()));
    out.push_str(&format!("Query:    {}\n", parsed.query_string.yellow()));
    out.push_str(&format!("{}\n", to_json(&parsed.query_params, indent)?));
    Ok(out)
}

fn render_jwt(jwt: &DecodedJwt, status: &TimestampStatus, indent: usize) -> anyhow::Result<String> {
    let params: Vec<String> = [("alg", jwt.algorithm()), ("typ", jwt.token_type())]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| format!("{name} {value}")))
        .collect();
    let mut out = "Header".bold().to_string();
    if !params.is_empty() {
        out.push_str(&format!(" ({})", params.join(", ")));
    }
    out.push_str(&format!("\n{}\n", to_json(&jwt.header, indent)?));
    out.push_str(&format!(
        "{}\n{}\n",
        "Payload".bold(),
        to_json(&with_formatted_timestamps(&jwt.payload), indent)?
    ));
    out.push_str(&format!("{}\n{}\n", "Signature".bold(), jwt.raw_signature.dimmed()));

    if status.is_expired {
        out.push_str(&format!("{} Token expired\n", "✗".red().bold()));
    } else if let Some(remaining) = &status.time_to_expiry {
        out.push_str(&format!("{} Expires in {}\n", "✓".green().bold(), remaining.bold()));
    } else {
        out.push_str(&format!("{} No expiry claim\n", "•".dimmed()));
    }
    if status.is_not_yet_valid {
        out.push_str(&format!("{} Not yet valid (nbf in the future)\n", "!".yellow().bold()));
    }
    Ok(out)
}
