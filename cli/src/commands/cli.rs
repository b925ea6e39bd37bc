use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Read-only S3 command dispatcher for AI agents")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Credentials profile handed to the session provider.
    #[arg(long, alias = "user-profile", global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Config file (defaults to ./s3lens.toml, then the user config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InvokeArgs {
    /// Client operation name, e.g. list_buckets
    pub command: String,

    /// Named parameters as a JSON object, e.g. '{"Bucket": "alpha"}'
    #[arg(long)]
    pub args: Option<String>,

    /// Maximum characters of output (defaults to config `default_limit`)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run one command and print the bounded result
    Invoke(InvokeArgs),
    /// List the operations this session may run
    Operations,
    /// Print the tool definition for agent frameworks as JSON
    Tool,
    /// Answer JSONL tool calls from stdin until EOF
    Serve,
}
