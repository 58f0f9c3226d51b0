use commit_insights::{
    api::AnalyzeResponse, logging, AnalysisOrchestrator, AnalysisOutcome, Config, GitHubClient,
    InsightGenerator, OpenAIAgent, RepoFetch,
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use dialoguer::Input;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GitHub account or repository URL (prompted for when omitted)
    github_url: Option<String>,

    /// Trailing window in days (defaults to the configured window, 7)
    #[arg(short, long)]
    days: Option<u32>,

    /// Print the same JSON envelope as the HTTP endpoint
    #[arg(long)]
    json: bool,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init(&cli.log_level)?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let github_url = match cli.github_url {
        Some(url) => url,
        None => Input::<String>::new()
            .with_prompt("Enter GitHub account or repository URL")
            .interact_text()?,
    };
    let days = cli.days.unwrap_or(config.default_days);

    let source = Arc::new(GitHubClient::from_config(&config)?);
    let agent = Arc::new(OpenAIAgent::from_config(&config)?);
    let orchestrator = AnalysisOrchestrator::new(
        source,
        InsightGenerator::new(agent, config.max_prompt_chars),
    );

    if !cli.json {
        println!(
            "{} {} {}",
            "Fetching commits for".bright_blue(),
            github_url.bright_white().bold(),
            format!("(last {} days)", days).bright_blue()
        );
    }

    let outcome = orchestrator.analyze(&github_url, days).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&AnalyzeResponse::from(&outcome))?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &AnalysisOutcome) {
    for fetch in outcome.skipped() {
        if let RepoFetch::Failed { repo, reason } = fetch {
            eprintln!("{} {}: {}", "Skipped".yellow(), repo, reason);
        }
    }

    match outcome {
        AnalysisOutcome::NoCommits { owner, repos_analyzed, .. } => {
            println!(
                "{}",
                format!(
                    "No commits found in the specified time period ({} repositories of {} checked)",
                    repos_analyzed, owner
                )
                .yellow()
            );
        }
        AnalysisOutcome::Completed { report, .. } => {
            println!("\n{}", format!("Analysis for {}", report.owner).bright_green().bold());
            println!("  {} {}", "Repositories analyzed:".bright_white(), report.repos_analyzed);
            println!("  {} {}", "Commits analyzed:".bright_white(), report.commits_analyzed);
            println!("{}\n", "=".repeat(60).bright_yellow());
            println!("{}", report.analysis);
        }
    }
}
