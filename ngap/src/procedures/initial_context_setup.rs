//! Initial Context Setup (§4.F): the AMF hands the gNB the UE's security
//! material so RRC can run Security Mode Command.

use crate::wire::{read_opt_bytes, write_opt_bytes};
use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use ue_id::RanUeNgapId;
use xxap::{NasPdu, SecurityKey, SupportedAlgorithms};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeSecurityCapabilities {
    pub nr_integrity_algorithms: SupportedAlgorithms,
    pub nr_ciphering_algorithms: SupportedAlgorithms,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialContextSetupRequest {
    pub ran_ue_ngap_id: RanUeNgapId,
    pub security_key: SecurityKey,
    pub ue_security_capabilities: UeSecurityCapabilities,
    pub nas_pdu: Option<NasPdu>,
}

impl SerDes for InitialContextSetupRequest {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_ran_ue_ngap_id(w, self.ran_ue_ngap_id)?;
        w.write_bytes(&self.security_key.to_wire_octets());
        w.write_bits(self.ue_security_capabilities.nr_integrity_algorithms.0 as u64, 16);
        w.write_bits(self.ue_security_capabilities.nr_ciphering_algorithms.0 as u64, 16);
        write_opt_bytes(w, &self.nas_pdu.as_ref().map(|p| p.0.clone()));
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let ran_ue_ngap_id = crate::wire::read_ran_ue_ngap_id(r)?;
        let key_bytes = r.read_bytes(32)?;
        let mut wire_key = [0u8; 32];
        wire_key.copy_from_slice(&key_bytes);
        let security_key = SecurityKey::from_wire_octets(wire_key);
        let nr_integrity_algorithms = SupportedAlgorithms(r.read_bits(16)? as u16);
        let nr_ciphering_algorithms = SupportedAlgorithms(r.read_bits(16)? as u16);
        let nas_pdu = read_opt_bytes(r)?.map(NasPdu);
        Ok(InitialContextSetupRequest {
            ran_ue_ngap_id,
            security_key,
            ue_security_capabilities: UeSecurityCapabilities { nr_integrity_algorithms, nr_ciphering_algorithms },
            nas_pdu,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialContextSetupResponse {
    pub ran_ue_ngap_id: RanUeNgapId,
}

impl SerDes for InitialContextSetupResponse {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_ran_ue_ngap_id(w, self.ran_ue_ngap_id)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        Ok(InitialContextSetupResponse { ran_ue_ngap_id: crate::wire::read_ran_ue_ngap_id(r)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialContextSetupFailure {
    pub ran_ue_ngap_id: RanUeNgapId,
    pub cause: xxap::Cause,
}

impl SerDes for InitialContextSetupFailure {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        crate::wire::write_ran_ue_ngap_id(w, self.ran_ue_ngap_id)?;
        crate::wire::write_cause(w, self.cause)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let ran_ue_ngap_id = crate::wire::read_ran_ue_ngap_id(r)?;
        let cause = crate::wire::read_cause(r)?;
        Ok(InitialContextSetupFailure { ran_ue_ngap_id, cause })
    }
}

pub struct InitialContextSetup;

impl net::Procedure for InitialContextSetup {
    type Request = InitialContextSetupRequest;
    type Success = InitialContextSetupResponse;
    type Failure = InitialContextSetupFailure;

    const NAME: &'static str = "InitialContextSetupProcedure";
    const CODE: u16 = 20;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn request_round_trips() {
        let req = InitialContextSetupRequest {
            ran_ue_ngap_id: RanUeNgapId(1),
            security_key: SecurityKey([7u8; 32]),
            ue_security_capabilities: UeSecurityCapabilities {
                nr_integrity_algorithms: SupportedAlgorithms(0xE000),
                nr_ciphering_algorithms: SupportedAlgorithms(0xE000),
            },
            nas_pdu: Some(NasPdu(vec![1, 2])),
        };
        let mut w = BitWriter::new();
        req.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(InitialContextSetupRequest::decode(&mut r).unwrap(), req);
    }
}
