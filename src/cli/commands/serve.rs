use clap::Args;

use crate::config::config;
use crate::server;

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (defaults to the configured port)")]
    pub port: Option<u16>,
    #[arg(long, help = "Start without the seeded course catalogue")]
    pub no_seed: bool,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut server_config = config().server.clone();
    if let Some(port) = args.port {
        server_config.port = port;
    }
    if args.no_seed {
        server_config.seed_courses = false;
    }
    server::serve(&server_config).await
}
