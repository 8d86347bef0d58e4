//! GTP-U transport IEs carried in F1AP/E1AP bearer-context IEs (§4.G, §4.H).

use std::net::{IpAddr, Ipv4Addr};

/// IPv4 transport-layer address as it appears on the wire: a byte string
/// whose length determines the address family. Only IPv4 is implemented -
/// IPv6/dual-stack transport addressing is out of scope for this subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportLayerAddress(pub Vec<u8>);

impl TryFrom<&str> for TransportLayerAddress {
    type Error = common::CoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let ip: Ipv4Addr = s.parse().map_err(|_| common::CoreError::DecodeError)?;
        Ok(TransportLayerAddress(ip.octets().to_vec()))
    }
}

impl TryFrom<TransportLayerAddress> for IpAddr {
    type Error = common::CoreError;

    fn try_from(addr: TransportLayerAddress) -> Result<Self, Self::Error> {
        let octets: [u8; 4] = addr.0.try_into().map_err(|_| common::CoreError::DecodeError)?;
        Ok(IpAddr::V4(Ipv4Addr::from(octets)))
    }
}

/// GTP Tunnel Endpoint Identifier, 4 octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GtpTeid(pub [u8; 4]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtpTunnel {
    pub transport_layer_address: TransportLayerAddress,
    pub gtp_teid: GtpTeid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpTransportLayerInformation {
    GtpTunnel(GtpTunnel),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ipv4_round_trips_through_transport_layer_address() {
        let addr = TransportLayerAddress::try_from("10.0.0.7").unwrap();
        assert_eq!(addr.0, vec![10, 0, 0, 7]);
        let ip: IpAddr = addr.try_into().unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)));
    }
}
