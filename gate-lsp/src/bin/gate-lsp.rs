use gate_config::Loader;
use gate_lsp::build_service;
use tokio::io::{stdin, stdout};
use tower_lsp::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Optional user configuration picked up from the working directory.
const USER_CONFIG: &str = "gate.toml";

#[tokio::main]
async fn main() {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gate_lsp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Loader::new().with_optional_file(USER_CONFIG).build() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("ignoring {}: {}", USER_CONFIG, err);
            Default::default()
        }
    };

    tracing::info!("starting gate language server");
    let (service, socket) = build_service(config);
    Server::new(stdin(), stdout(), socket).serve(service).await;
}
