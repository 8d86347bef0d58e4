//! NG Setup (§4.F): registers the gNB's served TAs with an AMF. Retry/
//! backoff on a `time_to_wait` failure is driven by the caller (the CU-CP
//! workflow layer), not by this crate - this only defines the wire shapes
//! and a fresh transaction id per attempt.

use crate::wire::{read_cause, read_opt_string, write_cause, write_opt_string};
use crate::{GlobalRanNodeId, SupportedTaItem};
use asn1_per::{BitReader, BitWriter, Decode, DecodeError, Encode, EncodeError};
use net::SerDes;
use xxap::Cause;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingDrx {
    V32,
    V64,
    V128,
    V256,
}

impl PagingDrx {
    fn code(self) -> i64 {
        match self {
            PagingDrx::V32 => 0,
            PagingDrx::V64 => 1,
            PagingDrx::V128 => 2,
            PagingDrx::V256 => 3,
        }
    }

    fn from_code(code: i64) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(PagingDrx::V32),
            1 => Ok(PagingDrx::V64),
            2 => Ok(PagingDrx::V128),
            3 => Ok(PagingDrx::V256),
            other => Err(DecodeError::InvalidDiscriminant(other as u64, "PagingDrx")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgSetupRequest {
    pub global_ran_node_id: GlobalRanNodeId,
    pub ran_node_name: Option<String>,
    pub supported_ta_list: Vec<SupportedTaItem>,
    pub default_paging_drx: PagingDrx,
}

impl SerDes for NgSetupRequest {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        self.global_ran_node_id.encode(w)?;
        write_opt_string(w, &self.ran_node_name);
        w.write_constrained_int(self.supported_ta_list.len() as i64, 1, 256)?;
        for ta in &self.supported_ta_list {
            ta.encode(w)?;
        }
        w.write_constrained_int(self.default_paging_drx.code(), 0, 3)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let global_ran_node_id = GlobalRanNodeId::decode(r)?;
        let ran_node_name = read_opt_string(r)?;
        let n = r.read_constrained_int(1, 256)?;
        let mut supported_ta_list = Vec::with_capacity(n as usize);
        for _ in 0..n {
            supported_ta_list.push(SupportedTaItem::decode(r)?);
        }
        let default_paging_drx = PagingDrx::from_code(r.read_constrained_int(0, 3)?)?;
        Ok(NgSetupRequest { global_ran_node_id, ran_node_name, supported_ta_list, default_paging_drx })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgSetupResponse {
    pub amf_name: String,
}

impl SerDes for NgSetupResponse {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_octet_string(self.amf_name.as_bytes());
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let bytes = r.read_octet_string()?;
        let amf_name = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidDiscriminant(0, "AmfName"))?;
        Ok(NgSetupResponse { amf_name })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgSetupFailure {
    pub cause: Cause,
    pub time_to_wait: Option<u8>,
}

impl SerDes for NgSetupFailure {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_cause(w, self.cause)?;
        w.write_bool(self.time_to_wait.is_some());
        if let Some(ttw) = self.time_to_wait {
            w.write_constrained_int(ttw as i64, 0, 255)?;
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let cause = read_cause(r)?;
        let time_to_wait = if r.read_bool()? { Some(r.read_constrained_int(0, 255)? as u8) } else { None };
        Ok(NgSetupFailure { cause, time_to_wait })
    }
}

pub struct NgSetup;

impl net::Procedure for NgSetup {
    type Request = NgSetupRequest;
    type Success = NgSetupResponse;
    type Failure = NgSetupFailure;

    const NAME: &'static str = "NGSetupProcedure";
    const CODE: u16 = 1;
}

#[cfg(test)]
mod test {
    use super::*;
    use xxap::{PlmnIdentity, Tac};

    #[test]
    fn request_round_trips() {
        let req = NgSetupRequest {
            global_ran_node_id: GlobalRanNodeId { plmn_identity: PlmnIdentity([0x00, 0xf1, 0x10]), gnb_id: 1 },
            ran_node_name: Some("gnb-1".to_string()),
            supported_ta_list: vec![SupportedTaItem {
                tac: Tac([0, 0, 1]),
                broadcast_plmns: vec![PlmnIdentity([0x00, 0xf1, 0x10])],
            }],
            default_paging_drx: PagingDrx::V128,
        };
        let mut w = BitWriter::new();
        req.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(NgSetupRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn failure_round_trips_with_time_to_wait() {
        let failure = NgSetupFailure { cause: Cause::MISC_UNSPECIFIED, time_to_wait: Some(10) };
        let mut w = BitWriter::new();
        failure.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(NgSetupFailure::decode(&mut r).unwrap(), failure);
    }
}
