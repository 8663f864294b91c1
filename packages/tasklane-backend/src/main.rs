/// Tasklane backend: config loading, store init, stdin/stdout command loop.
mod config;
mod protocol;

use std::io;

use tasklane_core::storage::local::FileStore;
use tasklane_core::storage::memory::MemoryStore;
use tasklane_core::storage::SlotStore;
use tasklane_core::Board;

fn main() {
    // Logs go to stderr; stdout carries protocol output only.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run() {
        log::error!("[tasklane.backend] {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);

    let store: Box<dyn SlotStore> = if config.ephemeral {
        log::info!("[tasklane.backend] Ephemeral board, nothing will be saved");
        Box::new(MemoryStore::new())
    } else {
        let dir = config.resolved_data_dir();
        log::info!("[tasklane.backend] Board data in {}", dir.display());
        Box::new(FileStore::open(dir)?)
    };

    let mut board = Board::open(store, config.store.clone());
    protocol::serve(&mut board, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
