use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(
    name = "jsonkit",
    about = "JSON toolkit: diff annotation, URL parameters and JWT inspection",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format; overrides the config file
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// TOML file with output defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify the paths touched by a structural diff tree
    Annotate(AnnotateArgs),
    /// Convert between URL query strings and JSON
    Params(ParamsArgs),
    /// Decode a JSON Web Token
    Jwt(JwtArgs),
}

#[derive(Args)]
pub struct AnnotateArgs {
    /// Diff tree file, or `-` for stdin
    pub diff: String,
    /// Before document, rendered with the left classifications
    #[arg(long, requires = "right")]
    pub left: Option<PathBuf>,
    /// After document, rendered with the right classifications
    #[arg(long, requires = "left")]
    pub right: Option<PathBuf>,
}

#[derive(Args)]
pub struct ParamsArgs {
    #[command(subcommand)]
    pub action: ParamsAction,
}

#[derive(Subcommand)]
pub enum ParamsAction {
    /// Split a URL or query string into JSON parameters
    Decode { input: String },
    /// Encode a JSON object (inline, or `@file`) as a query string
    Encode { json: String },
}

#[derive(Args)]
pub struct JwtArgs {
    pub token: String,
}
