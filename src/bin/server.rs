use clap::Parser;
use once_cell::sync::Lazy;
use role_stresscheck::server::router;
use role_stresscheck::{Error, QUESTION_BANK};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stress assessment HTTP API")]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // load the question master before accepting requests
    Lazy::force(&QUESTION_BANK);

    let listener = TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!(addr = %listener.local_addr()?, "stress assessment API listening");

    axum::serve(listener, router()).await?;
    Ok(())
}
