use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use tally_back::{app, AppState};
use tokio::time;
use tracing::info;

/// Stand-in for the remote todo API.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 7890)]
    port: u16,

    /// RON file the todos are loaded from and periodically written to.
    #[arg(long, default_value = "data.ron")]
    data: PathBuf,

    /// Seconds between snapshots of the data file.
    #[arg(long, default_value_t = 300)]
    save_interval: u64,

    /// PEM certificate; serves HTTPS when given together with `--key`.
    #[arg(long, requires = "key")]
    cert: Option<PathBuf>,

    /// PEM private key.
    #[arg(long, requires = "cert")]
    key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let state = Arc::new(AppState::load(&args.data)?);

    tokio::spawn({
        let state = state.clone();
        let data = args.data.clone();
        let interval = time::Duration::from_secs(args.save_interval);

        async move {
            loop {
                time::sleep(interval).await;
                if let Err(err) = state.store(&data).await {
                    tracing::error!("Failed to store data: {:?}", err);
                }
            }
        }
    });

    let addr = SocketAddr::from(([0; 4], args.port));
    let app = app(state);

    match (args.cert, args.key) {
        (Some(cert), Some(key)) => {
            let config = RustlsConfig::from_pem_file(cert, key).await?;

            info!(%addr, "serving todos over https");
            axum_server::bind_rustls(addr, config)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            info!(%addr, "serving todos over http");
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}
