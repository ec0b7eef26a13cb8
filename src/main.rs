use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quality_gate::config::BASE_URL_ENV;
use quality_gate::presenters::{interview, project, review};
use quality_gate::shell::{render_nav, PresenterKind};
use quality_gate::{
    CodeEditor, Config, GatePolicy, Language, ProjectUploader, ReviewClient, ReviewContextKind,
    ReviewResponse, Route,
};

#[derive(Parser)]
#[command(name = "quality-gate")]
#[command(about = "Submit code to the AI code quality gate and render the review")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(long, default_value = ".quality-gate/config.yml")]
    config: PathBuf,

    /// Base URL of the review service
    #[arg(long, env = BASE_URL_ENV)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a single code snippet
    Review(CodeArgs),

    /// Check whether a snippet is ready for a technical interview
    Interview(CodeArgs),

    /// Review a multi-file project
    Project {
        /// Language of every uploaded file
        #[arg(long, value_enum, default_value = "python")]
        language: Language,

        /// Files or glob patterns to upload
        #[arg(required = true)]
        files: Vec<String>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Check that the review service is reachable
    Health,

    /// List the available views
    Routes,
}

#[derive(Args)]
struct CodeArgs {
    /// Language of the snippet
    #[arg(long, value_enum, default_value = "python")]
    language: Language,

    /// Read code from this file instead of stdin
    #[arg(long)]
    file: Option<PathBuf>,

    /// Override the backend context implied by the command
    #[arg(long, value_enum)]
    context: Option<ReviewContextKind>,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Args)]
struct ReportArgs {
    /// Also write the report to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Exit non-zero when the decision fails the quality gate
    #[arg(long)]
    gate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, the report to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("quality_gate=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?.with_base_url(cli.api_url);

    let exit_code = match cli.command {
        Commands::Review(args) => run_snippet(&config, Route::Review, args).await?,
        Commands::Interview(args) => run_snippet(&config, Route::Interview, args).await?,
        Commands::Project {
            language,
            files,
            report,
        } => run_project(&config, language, &files, report).await?,
        Commands::Health => {
            let client = ReviewClient::new(config.base_url()?)?;
            let health = client.health().await?;
            println!("{}: {}", client.base_url(), health.status);
            0
        }
        Commands::Routes => {
            list_routes();
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run_snippet(config: &Config, route: Route, args: CodeArgs) -> Result<i32> {
    let code = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read code file: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read code from stdin")?;
            buffer
        }
    };

    let mut editor = CodeEditor::new(args.context.unwrap_or_else(|| route.context()));
    editor.set_language(args.language);
    editor.set_code(code);

    let client = ReviewClient::new(config.base_url()?)?;

    let mut result = None;
    if let Err(e) = editor.submit(&client, |r| result = Some(r)).await {
        if e.is_validation() {
            return Err(e.into());
        }
        error!(error = %e, "Analysis failed");
        anyhow::bail!("Failed to analyze code. Check the review service connection");
    }

    let response = result.context("Review service returned no result")?;
    finish(config, route, &response, &args.report)
}

async fn run_project(
    config: &Config,
    language: Language,
    patterns: &[String],
    report: ReportArgs,
) -> Result<i32> {
    let paths = expand_patterns(patterns)?;

    let mut uploader = ProjectUploader::new();
    uploader.set_language(language)?;
    if let Some(hint) = uploader.language_hint() {
        info!("{}", hint);
    }
    uploader.upload(&paths).await?;

    let client = ReviewClient::new(config.base_url()?)?;
    if let Err(e) = uploader.analyze(&client).await {
        if e.is_validation() {
            return Err(e.into());
        }
        error!(error = %e, "Project analysis failed");
        anyhow::bail!(uploader.error().unwrap_or("Failed to analyze project").to_string());
    }

    let response = uploader
        .result()
        .context("Review service returned no result")?;
    finish(config, Route::Project, response, &report)
}

/// Expand glob patterns; plain paths pass through untouched
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let matches = glob::glob(pattern)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        for entry in matches {
            let path = entry.with_context(|| format!("Failed to expand {}", pattern))?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }

    Ok(paths)
}

fn render(route: Route, response: &ReviewResponse, bar_width: usize) -> String {
    let body = match route.presenter() {
        PresenterKind::Review => review::present(Some(response)).map(|v| v.to_markdown(bar_width)),
        PresenterKind::Interview => {
            interview::present(Some(response)).map(|v| v.to_markdown(bar_width))
        }
        PresenterKind::Project => project::present(Some(response)).map(|v| v.to_markdown(bar_width)),
    };

    format!("{}\n\n{}", render_nav(route), body.unwrap_or_default())
}

fn finish(config: &Config, route: Route, response: &ReviewResponse, report: &ReportArgs) -> Result<i32> {
    let mut output = render(route, response, config.report.bar_width);

    let outcome = GatePolicy::from(&config.gate).evaluate(response);
    if report.gate {
        output.push_str(&format!("\n{}\n", outcome.banner()));
    }

    if let Some(path) = &report.output {
        fs::write(path, &output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(output = %path.display(), "Review report written");
    }

    println!("{}", output);

    if report.gate {
        return Ok(outcome.exit_code());
    }
    Ok(0)
}

fn list_routes() {
    for route in Route::ALL {
        println!(
            "{:<11} {:<20} context: {:?}",
            route.path(),
            route.label(),
            route.context()
        );
    }
    println!("/           redirects to {}", Route::from_path("/"));
}
