use clap::Parser;
use log::LevelFilter;
use std::io;
use std::sync::Arc;

use bktserve::args::Args;
use bktserve::logging::setup_logging;
use bktserve::server::{not_found, start_server};
use bktserve::{DirectoryStore, Middleware, StaticMiddleware};

fn main() -> io::Result<()> {
    let args = Args::parse();
    setup_logging(LevelFilter::Info);

    let config = args
        .static_config()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let store = DirectoryStore::new(&args.storage_root);
    log::info!(
        "Serving bucket {} from {} under {}",
        config.bucket,
        store.root().display(),
        config.root_path
    );
    if config.spa {
        log::info!("SPA fallback enabled");
    }

    let handler = StaticMiddleware::new(Arc::new(store), config).wrap(Arc::new(not_found));
    start_server(&args.listen_addr, handler)
}
