//! gNB-CU-UP E1 Setup (§4.H): a CU-UP attaches to the CU-CP over the E1
//! association, declaring its gNB-CU-UP-ID and name.

use crate::wire::{read_cause, read_opt_string, write_cause, write_opt_string};
use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use xxap::{Cause, GnbCuUpId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnbCuUpE1SetupRequest {
    pub gnb_cu_up_id: GnbCuUpId,
    pub gnb_cu_up_name: Option<String>,
}

impl SerDes for GnbCuUpE1SetupRequest {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        w.write_constrained_int(self.gnb_cu_up_id.0 as i64, 0, (1i64 << 36) - 1)?;
        write_opt_string(w, &self.gnb_cu_up_name);
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let gnb_cu_up_id = GnbCuUpId(r.read_constrained_int(0, (1i64 << 36) - 1)? as u64);
        let gnb_cu_up_name = read_opt_string(r)?;
        Ok(GnbCuUpE1SetupRequest { gnb_cu_up_id, gnb_cu_up_name })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnbCuUpE1SetupResponse {
    pub gnb_cu_cp_name: Option<String>,
}

impl SerDes for GnbCuUpE1SetupResponse {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_opt_string(w, &self.gnb_cu_cp_name);
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        Ok(GnbCuUpE1SetupResponse { gnb_cu_cp_name: read_opt_string(r)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnbCuUpE1SetupFailure {
    pub cause: Cause,
    pub time_to_wait: Option<u8>,
}

impl SerDes for GnbCuUpE1SetupFailure {
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
        Ok(GnbCuUpE1SetupFailure { cause, time_to_wait })
    }
}

pub struct GnbCuUpE1Setup;

impl net::Procedure for GnbCuUpE1Setup {
    type Request = GnbCuUpE1SetupRequest;
    type Success = GnbCuUpE1SetupResponse;
    type Failure = GnbCuUpE1SetupFailure;

    const NAME: &'static str = "GNBCUUPE1SetupProcedure";
    const CODE: u16 = 1;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn request_round_trips() {
        let req = GnbCuUpE1SetupRequest { gnb_cu_up_id: GnbCuUpId(9), gnb_cu_up_name: Some("cu-up-1".to_string()) };
        let mut w = BitWriter::new();
        req.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(GnbCuUpE1SetupRequest::decode(&mut r).unwrap(), req);
    }
}
