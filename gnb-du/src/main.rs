//! gnb-du - connects to a CU-CP's F1-C listener, registers its served
//! cells via F1 Setup, and then runs a slot-indication loop over whatever
//! UEs have attached. A single demo UE is admitted at startup so the
//! binary has something to schedule without a real radio underneath it.

use anyhow::Result;
use async_std::stream::StreamExt as AsyncStreamExt;
use async_std::task;
use clap::Parser;
use du::CellConfig;
use futures_lite::StreamExt;
use gnb_du::config;
use gnb_du::worker::Worker;
use scheduler::{SearchSpace, TimeDomainResource};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_async_std::Signals;
use std::net::IpAddr;
use std::time::Duration;
use ue_id::CRnti;
use xxap::{NrCellIdentity, NrCgi, PlmnIdentity, Tac};

#[derive(Parser, Debug)]
#[command(name = "gnb-du", about = "gNB-DU (F1-C client + DU-high MAC/scheduler)")]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    ip_addr: IpAddr,
    #[arg(long, default_value = "127.0.0.1")]
    cu_cp_ip_addr: IpAddr,
    #[arg(long, default_value_t = 1)]
    gnb_du_id: u64,
    #[arg(long)]
    du_name: Option<String>,
    #[arg(long, default_value_t = 1)]
    nr_cell_id: u64,
    #[arg(long, default_value_t = false)]
    demo_ue: bool,
}

fn demo_cell(nr_cell_id: u64) -> CellConfig {
    CellConfig {
        nr_cgi: NrCgi { plmn_identity: PlmnIdentity([0x00, 0xf1, 0x10]), nr_cell_identity: NrCellIdentity::new(nr_cell_id) },
        tac: Tac([0, 0, 1]),
        packed_mib: vec![0; 3],
        packed_sib1: vec![0; 8],
    }
}

fn demo_search_spaces() -> Vec<SearchSpace> {
    vec![SearchSpace {
        id: 0,
        is_common_ss0: true,
        coreset_first_symbol: 0,
        coreset_duration: 1,
        time_domain_list: vec![TimeDomainResource { k0: 0, symbol_start: 2, symbol_len: 10 }],
        has_pdcch_candidates: true,
    }]
}

#[async_std::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = common::logging::build_logger("gnb-du");

    let config = config::Config {
        core: common::CoreConfig::default(),
        ip_addr: cli.ip_addr,
        cu_cp_ip_addr: cli.cu_cp_ip_addr,
        gnb_du_id: xxap::GnbDuId(cli.gnb_du_id),
        gnb_du_name: cli.du_name.clone(),
        cells: vec![demo_cell(cli.nr_cell_id)],
    };

    let du = Worker::new(config, logger.clone());
    du.connect().await?;
    du.f1_setup().await?;

    if cli.demo_ue {
        let nr_cgi = demo_cell(cli.nr_cell_id).nr_cgi;
        du.attach_ue(CRnti(0x4601), nr_cgi, vec![0u8; 8]).await?;
    }

    slog::info!(logger, "gNB-DU up and running");

    let search_spaces = demo_search_spaces();
    let du_ticker = du.clone();
    let tick_logger = logger.clone();
    task::spawn(async move {
        let mut slot: u64 = 0;
        let mut ticks = async_std::stream::interval(Duration::from_millis(10));
        while AsyncStreamExt::next(&mut ticks).await.is_some() {
            for (index, alloc) in du_ticker.tick_dl_slot(&search_spaces, slot).await {
                slog::debug!(tick_logger, "DL allocation"; "du_ue_index" => index.0, "subpdus" => alloc.subpdus.len());
            }
            slot += 1;
        }
    });

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    AsyncStreamExt::next(&mut signals).await;
    slog::info!(logger, "shutting down");

    du.graceful_shutdown().await;
    task::sleep(Duration::from_millis(50)).await;
    Ok(())
}
