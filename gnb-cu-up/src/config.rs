//! gNB-CU-UP process configuration (§4.H): the address/identity surface on
//! top of the shared `common::CoreConfig`.

use common::CoreConfig;
use std::net::IpAddr;
use xxap::GnbCuUpId;

#[derive(Debug, Clone)]
pub struct Config {
    pub core: CoreConfig,
    /// Local address this worker connects to the CU-CP's E1 listener from,
    /// and the address it advertises in its DL GTP tunnels.
    pub ip_addr: IpAddr,
    pub cu_cp_ip_addr: IpAddr,
    pub gnb_cu_up_id: GnbCuUpId,
    pub gnb_cu_up_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            core: CoreConfig::default(),
            ip_addr: IpAddr::from([127, 0, 0, 1]),
            cu_cp_ip_addr: IpAddr::from([127, 0, 0, 1]),
            gnb_cu_up_id: GnbCuUpId(1),
            gnb_cu_up_name: Some("cu-up-1".to_string()),
        }
    }
}
