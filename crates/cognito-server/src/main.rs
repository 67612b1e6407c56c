//! Cognito Server Binary
//!
//! Loads configuration from the working directory, then delegates to lib.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cognito_server::init_tracing();

    let cwd = std::env::current_dir()?;
    let config = cognito_core::load_config(&cwd)?;

    cognito_server::run_server(config).await
}
