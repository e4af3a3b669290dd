use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;

use codemorph::server::config_routes;
use codemorph::util::{self, AppState};

/// Command-line options for the codemorph server.
#[derive(Debug, Parser)]
#[command(
    name = "codemorph",
    version,
    about = "Code conversion service backed by a chat-completion endpoint"
)]
struct Args {
    /// Address to bind the HTTP server to (falls back to BIND_ADDR, then 0.0.0.0:8080).
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    util::init_tracing();

    let args = Args::parse();
    let bind = args.bind.unwrap_or_else(util::env_bind_addr);

    let state = web::Data::new(AppState::from_env().context("initializing application state")?);
    tracing::info!("codemorph listening on {bind}");

    HttpServer::new(move || {
        App::new()
            .wrap(util::cors_config_from_env())
            .app_data(state.clone())
            .configure(config_routes)
    })
    .bind(&bind)
    .with_context(|| format!("binding {bind}"))?
    .run()
    .await?;

    Ok(())
}
