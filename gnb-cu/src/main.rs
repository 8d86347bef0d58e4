//! gnb-cu - the combined gNB-CU-CP + gNB-CU-UP binary. Runs both workers in
//! one process connected over a loopback E1 association, since this
//! workspace does not implement a standalone user-plane data path that
//! would require them to live on separate hosts.

mod config;

use anyhow::Result;
use async_std::task;
use config::Cli;
use futures_lite::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_async_std::Signals;

#[async_std::main]
async fn main() -> Result<()> {
    let cli = <Cli as clap::Parser>::parse();
    let logger = common::logging::build_logger("gnb-cu");

    let cu_cp = gnb_cu_cp::Worker::new(cli.cu_cp_config(), logger.new(slog::o!("node" => "cu-cp")));
    let cu_up = gnb_cu_up::Worker::new(cli.cu_up_config(), logger.new(slog::o!("node" => "cu-up")));

    cu_cp.serve_f1ap().await?;
    cu_cp.serve_e1ap().await?;
    cu_up.connect().await?;
    cu_up.e1_setup().await?;
    cu_cp.ng_setup().await?;

    slog::info!(logger, "gNB-CU up and running");

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    signals.next().await;
    slog::info!(logger, "shutting down");

    cu_up.graceful_shutdown().await;
    cu_cp.graceful_shutdown().await;
    task::sleep(std::time::Duration::from_millis(50)).await;
    Ok(())
}
