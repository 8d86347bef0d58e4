//! gNB-DU process configuration (§4.K): address/identity surface plus the
//! cells this DU serves, on top of the shared `common::CoreConfig`.

use common::CoreConfig;
use du::CellConfig;
use std::net::IpAddr;
use xxap::GnbDuId;

#[derive(Debug, Clone)]
pub struct Config {
    pub core: CoreConfig,
    pub ip_addr: IpAddr,
    pub cu_cp_ip_addr: IpAddr,
    pub gnb_du_id: GnbDuId,
    pub gnb_du_name: Option<String>,
    pub cells: Vec<CellConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            core: CoreConfig::default(),
            ip_addr: IpAddr::from([127, 0, 0, 1]),
            cu_cp_ip_addr: IpAddr::from([127, 0, 0, 1]),
            gnb_du_id: GnbDuId(1),
            gnb_du_name: Some("du-1".to_string()),
            cells: Vec::new(),
        }
    }
}
