//! CU-CP process configuration (§6): the address surface on top of the
//! shared `common::CoreConfig`. Building this from a file or CLI flags is
//! out of scope - something above this crate constructs a `Config` and
//! passes it to `Worker::new`.

use common::CoreConfig;
use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub core: CoreConfig,
    /// Local address this worker binds its F1AP/E1AP listeners on and
    /// connects to the AMF from.
    pub ip_addr: IpAddr,
    pub amf_ip_addr: IpAddr,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            core: CoreConfig::default(),
            ip_addr: IpAddr::from([127, 0, 0, 1]),
            amf_ip_addr: IpAddr::from([127, 0, 0, 1]),
        }
    }
}
