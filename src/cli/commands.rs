use std::path::PathBuf;
use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "bcb-agent", version, about = "BCB Agent remediation demo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Show the three-phase roadmap
    Phases(PhasesArgs),
    /// Run one remediation session in the terminal
    Remediate(RemediateArgs),
    /// Extract the text of a PDF file
    Extract(ExtractArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone, Default)]
pub struct LlmArgs {
    /// LLM provider: openai, local
    #[arg(long)]
    pub provider: Option<String>,

    /// LLM model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// LLM API key (or use OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Override the provider endpoint
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bearer token required by the API (or use BCB_API_TOKEN)
    #[arg(long)]
    pub api_token: Option<String>,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Args, Clone)]
pub struct PhasesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct RemediateArgs {
    /// Description of the bug to remediate
    #[arg(short, long)]
    pub bug: String,

    /// Roadmap phase to demo: phase1, phase2, phase3
    #[arg(short, long, default_value = "phase1")]
    pub phase: String,

    /// Text file with system information
    #[arg(long)]
    pub system_info: Option<PathBuf>,

    /// PDF with additional context
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Extract the PDF through a running server instead of in-process
    #[arg(long)]
    pub extract_url: Option<String>,

    /// Give negative feedback at the end
    #[arg(long)]
    pub thumbs_down: bool,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Args, Clone)]
pub struct ExtractArgs {
    /// PDF file to read
    pub pdf: PathBuf,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
