// --- Painel de Viabilidade Territorial - Arquivo principal ---

use tracing::info;
use viabilidade::{run_server, Config};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("=== Painel de Viabilidade Territorial (API) ===");
    info!("Iniciando servidor em http://{}", config.bind);
    run_server(config).await
}
