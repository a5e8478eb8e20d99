mod config;
mod error;
mod generator;
mod html;
mod model;
mod pipeline;
mod prompt;
mod render;
mod split;
mod template;
mod validate;

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brd_common::gemini::{GeminiClient, GeminiClientConfig};

use config::Config;
use generator::BrdGenerator;
use model::{GenerationRequest, OutputFormat, PipelineOutcome};

/// Generate a Business Requirements Document from a project description.
#[derive(Debug, Parser)]
#[command(name = "brd-gen", version, about)]
struct Cli {
    /// Project description, or "-" to read it from stdin
    description: String,

    /// .docx template whose level-1 headings scaffold the document
    #[arg(long)]
    template: Option<PathBuf>,

    /// Project name used in the prompt and the artifact file name
    #[arg(long, default_value = "User Project")]
    project_name: String,

    /// Output format: text, docx or pdf (overrides BRD_OUTPUT_FORMAT)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Overall generation deadline in seconds (overrides BRD_GENERATION_DEADLINE_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    // 1. Load config from environment; CLI flags win over env
    let config = Config::from_env_with(cli.format, cli.timeout_secs.map(Duration::from_secs))?;
    info!(
        model = %config.model,
        format = %config.output_format,
        output_dir = %config.output_dir.display(),
        "configuration loaded"
    );

    let request = GenerationRequest {
        project_name: cli.project_name,
        user_input: read_description(&cli.description)?,
        template_path: cli.template,
    };

    // 2. Build the Gemini-backed generator
    let client_config = GeminiClientConfig::from_env(config.api_key.clone());
    info!(
        base_url = %client_config.base_url,
        timeout_ms = client_config.default_timeout.as_millis(),
        max_retries = client_config.max_retries,
        "gemini client configured"
    );
    let client = GeminiClient::new(client_config)?;
    let generator = BrdGenerator::new(client, config.model.clone(), config.prompt_style);

    // 3. Run the pipeline and report the terminal outcome
    match pipeline::run(&config, &generator, &request).await {
        Ok(PipelineOutcome::Artifact(artifact)) => {
            println!("{}", artifact.file_path.display());
            Ok(())
        }
        Ok(PipelineOutcome::Rejected { reason }) => {
            eprintln!("rejected: {reason}");
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!(error = %e, "pipeline failed");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn read_description(arg: &str) -> std::io::Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(arg.to_string())
    }
}
