use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Worker count comes from `performance.workers`, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.performance.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let listener_cfg = config::ListenerConfig::default();

    let listener = server::create_listener(listener_cfg.addr)
        .map_err(|e| format!("failed to bind {}: {e}", listener_cfg.addr))?;

    println!("{}", config::STARTUP_MESSAGE);
    logger::log_server_start(&listener_cfg, &cfg);

    let state = Arc::new(config::AppState::new(cfg, &listener_cfg));
    server::start_server_loop(listener, state).await;
    Ok(())
}
