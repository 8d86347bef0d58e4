//! Segmented byte buffers and the ASN.1 PER codec boundary (§4.A, §4.C).
//!
//! Generating a full, TS-complete PER codec from the 38.413/38.473/37.483
//! ASN.1 modules is explicitly out of scope (§1 non-goals). What lives here
//! is the boundary every protocol engine packs/unpacks through: a `Buffer`
//! container, a bit cursor implementing the representative subset of
//! unaligned PER the message types actually use, and `pack`/`unpack`
//! entry points that turn codec failures into the `<DecodeError>`/
//! `<EncodeError>` kinds from §7 without ever handing a caller a
//! partially-decoded value.

mod buffer;
mod cursor;

pub use buffer::Buffer;
pub use cursor::{BitReader, BitWriter, DecodeError, EncodeError};
use common::CoreError;

/// Implemented by every PDU type that crosses the wire.
pub trait Encode {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError>;
}

/// Implemented by every PDU type that crosses the wire.
pub trait Decode: Sized {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError>;
}

/// Pack a PDU to bytes for handoff to the SCTP gateway.
pub fn pack<T: Encode>(pdu: &T) -> Result<Buffer, CoreError> {
    let mut w = BitWriter::new();
    pdu.encode(&mut w).map_err(|_| CoreError::EncodeError)?;
    Ok(Buffer::from_vec(w.into_bytes()))
}

/// Unpack bytes received from the SCTP gateway into a PDU.
///
/// On failure the caller must log and drop (§4.C) - no partially-decoded
/// value is ever returned, since `Decode::decode` only returns `Ok` once
/// the whole structure round-tripped through the cursor.
pub fn unpack<T: Decode>(bytes: &Buffer) -> Result<T, CoreError> {
    let contiguous = bytes.to_contiguous();
    let mut r = BitReader::new(&contiguous);
    T::decode(&mut r).map_err(|_| CoreError::DecodeError)
}

#[cfg(test)]
mod test {
    use super::*;

    struct Toy {
        a: i64,
        b: Vec<u8>,
    }

    impl Encode for Toy {
        fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
            w.write_constrained_int(self.a, 0, 65535)?;
            w.write_octet_string(&self.b);
            Ok(())
        }
    }

    impl Decode for Toy {
        fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
            let a = r.read_constrained_int(0, 65535)?;
            let b = r.read_octet_string()?;
            Ok(Toy { a, b })
        }
    }

    #[test]
    fn pack_unpack_round_trip() {
        let toy = Toy {
            a: 1234,
            b: vec![1, 2, 3, 4],
        };
        let bytes = pack(&toy).unwrap();
        let back: Toy = unpack(&bytes).unwrap();
        assert_eq!(back.a, 1234);
        assert_eq!(back.b, vec![1, 2, 3, 4]);
    }

    #[test]
    fn unpack_failure_is_decode_error() {
        let bytes = Buffer::from_vec(vec![]);
        let result: Result<Toy, CoreError> = unpack(&bytes);
        assert_eq!(result.err(), Some(CoreError::DecodeError));
    }
}
