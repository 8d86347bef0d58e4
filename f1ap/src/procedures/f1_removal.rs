//! F1 Removal (§4.G): the DU asks the CU to tear down the F1-C association,
//! e.g. during a planned DU shutdown.

use crate::wire::{read_transaction_id, write_transaction_id};
use asn1_per::{BitReader, BitWriter, DecodeError, EncodeError};
use net::SerDes;
use xxap::{Cause, TransactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct F1RemovalRequest {
    pub transaction_id: TransactionId,
}

impl SerDes for F1RemovalRequest {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_transaction_id(w, self.transaction_id)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        Ok(F1RemovalRequest { transaction_id: read_transaction_id(r)? })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct F1RemovalResponse {
    pub transaction_id: TransactionId,
}

impl SerDes for F1RemovalResponse {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_transaction_id(w, self.transaction_id)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        Ok(F1RemovalResponse { transaction_id: read_transaction_id(r)? })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct F1RemovalFailure {
    pub transaction_id: TransactionId,
    pub cause: Cause,
}

impl SerDes for F1RemovalFailure {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        write_transaction_id(w, self.transaction_id)?;
        crate::wire::write_cause(w, self.cause)
    }

    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        let transaction_id = read_transaction_id(r)?;
        let cause = crate::wire::read_cause(r)?;
        Ok(F1RemovalFailure { transaction_id, cause })
    }
}

pub struct F1Removal;

impl net::Procedure for F1Removal {
    type Request = F1RemovalRequest;
    type Success = F1RemovalResponse;
    type Failure = F1RemovalFailure;

    const NAME: &'static str = "F1RemovalProcedure";
    const CODE: u16 = 30;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn request_round_trips() {
        let req = F1RemovalRequest { transaction_id: TransactionId(5) };
        let mut w = BitWriter::new();
        req.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = BitReader::new(&bytes);
        assert_eq!(F1RemovalRequest::decode(&mut r).unwrap(), req);
    }
}
