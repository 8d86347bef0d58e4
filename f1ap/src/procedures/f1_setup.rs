//! F1 Setup (§4.G): DU registers its served cells with the CU over the F1-C
//! association before any UE traffic can flow.

use crate::wire::{read_transaction_id, write_transaction_id};
use crate::ServedCellInformation;
use asn1_per::{BitReader, BitWriter, Decode, DecodeError, Encode, EncodeError};
use net::SerDes;
use xxap::{Cause, GnbDuId, TransactionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F1SetupRequest {
    pub transaction_id: TransactionId,
    pub gnb_du_id: GnbDuId,
    pub gnb_du_name: Option<String>,
    pub served_cells: Vec<ServedCellInformation>,
}

impl SerDes for F1SetupRequest {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_transaction_id(w, self.transaction_id)?;
        w.write_constrained_int(self.gnb_du_id.0 as i64, 0, (1i64 << 36) - 1)?;
        crate::wire::write_opt_string(w, &self.gnb_du_name);
        w.write_constrained_int(self.served_cells.len() as i64, 0, 16)?;
        for cell in &self.served_cells {
            cell.encode(w)?;
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let transaction_id = read_transaction_id(r)?;
        let gnb_du_id = GnbDuId(r.read_constrained_int(0, (1i64 << 36) - 1)? as u64);
        let gnb_du_name = crate::wire::read_opt_string(r)?;
        let n = r.read_constrained_int(0, 16)?;
        let mut served_cells = Vec::with_capacity(n as usize);
        for _ in 0..n {
            served_cells.push(ServedCellInformation::decode(r)?);
        }
        Ok(F1SetupRequest { transaction_id, gnb_du_id, gnb_du_name, served_cells })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F1SetupResponse {
    pub transaction_id: TransactionId,
    pub gnb_cu_name: Option<String>,
}

impl SerDes for F1SetupResponse {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_transaction_id(w, self.transaction_id)?;
        crate::wire::write_opt_string(w, &self.gnb_cu_name);
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let transaction_id = read_transaction_id(r)?;
        let gnb_cu_name = crate::wire::read_opt_string(r)?;
        Ok(F1SetupResponse { transaction_id, gnb_cu_name })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F1SetupFailure {
    pub transaction_id: TransactionId,
    pub cause: Cause,
    pub time_to_wait: Option<u8>,
}

impl SerDes for F1SetupFailure {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_transaction_id(w, self.transaction_id)?;
        crate::wire::write_cause(w, self.cause)?;
        w.write_bool(self.time_to_wait.is_some());
        if let Some(ttw) = self.time_to_wait {
            w.write_constrained_int(ttw as i64, 0, 255)?;
        }
        Ok(())
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let transaction_id = read_transaction_id(r)?;
        let cause = crate::wire::read_cause(r)?;
        let time_to_wait =
            if r.read_bool()? { Some(r.read_constrained_int(0, 255)? as u8) } else { None };
        Ok(F1SetupFailure { transaction_id, cause, time_to_wait })
    }
}

pub struct F1Setup;

impl net::Procedure for F1Setup {
    type Request = F1SetupRequest;
    type Success = F1SetupResponse;
    type Failure = F1SetupFailure;

    const NAME: &'static str = "F1SetupProcedure";
    const CODE: u16 = 1;
}

#[cfg(test)]
mod test {
    use super::*;
    use xxap::{NrCellIdentity, NrCgi, PlmnIdentity, Tac};

    #[test]
    fn request_round_trips() {
        let req = F1SetupRequest {
            transaction_id: TransactionId(3),
            gnb_du_id: GnbDuId(123),
            gnb_du_name: Some("du-1".to_string()),
            served_cells: vec![ServedCellInformation {
                nr_cgi: NrCgi {
                    plmn_identity: PlmnIdentity([0x00, 0xf1, 0x10]),
                    nr_cell_identity: NrCellIdentity::new(0xABCDE1234),
                },
                tac: Tac([0, 0, 1]),
                packed_mib: vec![1, 2, 3],
                packed_sib1: vec![4, 5, 6, 7],
            }],
        };
        let mut w = BitWriter::new();
        req.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(F1SetupRequest::decode(&mut r).unwrap(), req);
    }

    #[test]
    fn failure_round_trips_without_time_to_wait() {
        let failure = F1SetupFailure {
            transaction_id: TransactionId(1),
            cause: Cause::RADIO_UNSPECIFIED,
            time_to_wait: None,
        };
        let mut w = BitWriter::new();
        failure.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(F1SetupFailure::decode(&mut r).unwrap(), failure);
    }
}
