//! CLI surface for the combined gNB-CU binary: everything needed to build
//! both a `gnb_cu_cp::Config` and a `gnb_cu_up::Config` from one set of
//! flags. Parsing a config *file* is out of scope (§6 non-goal) - this is
//! the thin `clap`-based `main` the ambient-stack section calls for.

use clap::Parser;
use std::net::IpAddr;

#[derive(Parser, Debug)]
#[command(name = "gnb-cu", about = "gNB-CU-CP + gNB-CU-UP in one process")]
pub struct Cli {
    /// Address this node binds its F1-C/E1 listeners on and connects to the AMF from.
    #[arg(long, default_value = "127.0.0.1")]
    pub ip_addr: IpAddr,

    /// AMF address for NG-C.
    #[arg(long, default_value = "127.0.0.1")]
    pub amf_ip_addr: IpAddr,

    /// gNB identifier (TS 38.413 GlobalRanNodeId value).
    #[arg(long, default_value_t = 1)]
    pub gnb_id: u32,

    #[arg(long, default_value_t = 22)]
    pub gnb_id_bits: u8,

    #[arg(long)]
    pub ran_node_name: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub gnb_cu_up_id: u64,
}

impl Cli {
    pub fn cu_cp_config(&self) -> gnb_cu_cp::Config {
        let mut core = common::CoreConfig::default();
        core.gnb_id = self.gnb_id;
        core.gnb_id_bits = self.gnb_id_bits;
        core.ran_node_name = self.ran_node_name.clone();
        gnb_cu_cp::Config { core, ip_addr: self.ip_addr, amf_ip_addr: self.amf_ip_addr }
    }

    pub fn cu_up_config(&self) -> gnb_cu_up::Config {
        gnb_cu_up::Config {
            core: common::CoreConfig::default(),
            ip_addr: self.ip_addr,
            cu_cp_ip_addr: self.ip_addr,
            gnb_cu_up_id: xxap::GnbCuUpId(self.gnb_cu_up_id),
            gnb_cu_up_name: self.ran_node_name.clone(),
        }
    }
}
