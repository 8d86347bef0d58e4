//! KgNB and security-algorithm IEs (§4.F "Security key copy").
//!
//! The AMF transmits KgNB as a 256-bit bitstring in network order; we store
//! it byte-wise reversed so index 0 holds the *last* ASN.1 octet and index
//! 31 the first, matching the field convention the teacher's NGAP code uses
//! for key material throughout (key math and KDFs index from the end).

#[derive(Clone, PartialEq, Eq)]
pub struct SecurityKey(pub [u8; 32]);

impl std::fmt::Debug for SecurityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecurityKey(<redacted>)")
    }
}

impl SecurityKey {
    /// Builds a `SecurityKey` from the 32 octets as received on the wire
    /// (network order), storing them byte-reversed.
    pub fn from_wire_octets(wire: [u8; 32]) -> Self {
        let mut reversed = wire;
        reversed.reverse();
        SecurityKey(reversed)
    }

    /// Recovers the original wire octets.
    pub fn to_wire_octets(&self) -> [u8; 32] {
        let mut wire = self.0;
        wire.reverse();
        wire
    }
}

/// NIA1/NIA2/NIA3 (integrity) or NEA1/NEA2/NEA3 (ciphering) supported
/// algorithms, a 16-bit big-endian bitstring where only the first three
/// bits of each octet are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedAlgorithms(pub u16);

impl SupportedAlgorithms {
    /// Bit index 0 = algorithm 1 (NIA1/NEA1) ... index 2 = algorithm 3.
    pub fn supports(&self, algorithm: u8) -> bool {
        if !(1..=3).contains(&algorithm) {
            return false;
        }
        let bit = 15 - u32::from(algorithm - 1);
        (self.0 >> bit) & 1 == 1
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn security_key_reversal_round_trips() {
        let mut wire = [0u8; 32];
        wire[0] = 0xAA;
        wire[31] = 0xBB;
        let key = SecurityKey::from_wire_octets(wire);
        assert_eq!(key.0[31], 0xAA);
        assert_eq!(key.0[0], 0xBB);
        assert_eq!(key.to_wire_octets(), wire);
    }

    #[test]
    fn supported_algorithms_reads_top_three_bits_of_each_octet() {
        // Algorithm 1 bit set (bit 15), algorithm 3 bit set (bit 13).
        let algs = SupportedAlgorithms(0b1010_0000_0000_0000);
        assert!(algs.supports(1));
        assert!(!algs.supports(2));
        assert!(algs.supports(3));
    }
}
