use commit_insights::{
    api::{create_app, AppState},
    logging, AnalysisOrchestrator, Config, GitHubClient, InsightGenerator, OpenAIAgent,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    logging::init(&log_level)?;

    let config_path = std::env::var("COMMIT_INSIGHTS_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    let source = Arc::new(GitHubClient::from_config(&config)?);
    let agent = Arc::new(OpenAIAgent::from_config(&config)?);
    let orchestrator = AnalysisOrchestrator::new(
        source,
        InsightGenerator::new(agent, config.max_prompt_chars),
    );
    let state = AppState::new(orchestrator, config.default_days);

    info!("commit-insights server starting...");
    info!("GitHub API: {}", config.github_api_base);
    info!("Model: {}", config.model);
    if config.github_token().is_none() {
        info!("GITHUB_TOKEN not set, GitHub requests are unauthenticated");
    }

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
