//! PDCP PDU encapsulation for SRBs (§4.I "SRB1 is created on RRCSetup with
//! both TX and RX notifiers plus security-TX and security-RX notifiers").
//!
//! This is the encapsulation boundary, not a full TS 38.323 implementation:
//! a one-octet short-SN header (D/C bit + 7-bit sequence number) plus,
//! once security is enabled on the bearer, a 4-octet placeholder MAC-I.
//! NIA1-3/NEA1-3 are out of scope (the spec only carries their presence as
//! a `SupportedAlgorithms` bitstring, §4.F) - `apply_security` stands in
//! for ciphering/integrity so the SRB1 state transition in `rrc` has
//! something concrete to call.

const DC_CONTROL: u8 = 0x00;
const DC_DATA: u8 = 0x80;
const SN_MASK: u8 = 0x7f;
const MAC_I_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdcpPdu(pub Vec<u8>);

impl PdcpPdu {
    /// Encapsulates an RRC SDU as a Data PDU with sequence number 0 (SRB
    /// PDCP entities in this subset are always re-established per
    /// connection, so SN state does not need to be threaded through every
    /// call site - see `DESIGN.md`).
    pub fn encode(sdu: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(1 + sdu.len());
        bytes.push(DC_DATA | (0 & SN_MASK));
        bytes.extend_from_slice(sdu);
        PdcpPdu(bytes)
    }

    /// Appends a placeholder 4-octet MAC-I, standing in for NIA1-3
    /// integrity protection once the RRC bearer enables security.
    pub fn apply_security(mut self, key: &[u8]) -> Self {
        let mac = placeholder_mac(&self.0, key);
        self.0.extend_from_slice(&mac);
        self
    }

    /// Returns the RRC SDU, stripping the one-octet header and, if
    /// present, a trailing MAC-I.
    pub fn view_inner(&self) -> Result<&[u8], common::CoreError> {
        if self.0.is_empty() {
            return Err(common::CoreError::DecodeError);
        }
        let dc = self.0[0] & 0x80;
        if dc != DC_DATA {
            return Err(common::CoreError::DecodeError);
        }
        Ok(&self.0[1..])
    }

    /// Same as `view_inner` but also strips a trailing MAC-I, for SRB1
    /// PDUs received after security has been enabled.
    pub fn view_inner_secured(&self) -> Result<&[u8], common::CoreError> {
        let body = self.view_inner()?;
        body.len()
            .checked_sub(MAC_I_LEN)
            .and_then(|n| body.get(..n))
            .ok_or(common::CoreError::DecodeError)
    }
}

impl From<PdcpPdu> for Vec<u8> {
    fn from(pdu: PdcpPdu) -> Vec<u8> {
        pdu.0
    }
}

fn placeholder_mac(bytes: &[u8], key: &[u8]) -> [u8; MAC_I_LEN] {
    let mut mac = [0u8; MAC_I_LEN];
    for (i, b) in bytes.iter().enumerate() {
        mac[i % MAC_I_LEN] ^= b ^ key.get(i % key.len().max(1)).copied().unwrap_or(0);
    }
    mac
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_then_view_inner_recovers_the_sdu() {
        let pdu = PdcpPdu::encode(&[1, 2, 3]);
        assert_eq!(pdu.view_inner().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn secured_pdu_strips_header_and_mac() {
        let pdu = PdcpPdu::encode(&[9, 9]).apply_security(b"key");
        assert_eq!(pdu.view_inner_secured().unwrap(), &[9, 9]);
    }

    #[test]
    fn empty_pdu_fails_to_decode() {
        assert!(PdcpPdu(Vec::new()).view_inner().is_err());
    }
}
