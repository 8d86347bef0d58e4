//! UE-facing RRC PDUs (§4.I). A representative subset of TS 38.331: enough
//! variants to drive RRC connection setup, security activation and
//! reconfiguration, encoded with the same `asn1_per::Encode`/`Decode`
//! boundary every other protocol crate uses - not the full TS 38.331
//! ASN.1 module.

use asn1_per::{BitReader, BitWriter, Decode, DecodeError, Encode, EncodeError};

fn write_opt_bytes(w: &mut BitWriter, v: &Option<Vec<u8>>) {
    w.write_bool(v.is_some());
    if let Some(b) = v {
        w.write_octet_string(b);
    }
}

fn read_opt_bytes(r: &mut BitReader) -> Result<Option<Vec<u8>>, DecodeError> {
    if r.read_bool()? {
        Ok(Some(r.read_octet_string()?))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstablishmentCause {
    Emergency,
    MoSignalling,
    MoData,
    MoVoiceCall,
    MtAccess,
}

impl EstablishmentCause {
    fn to_code(self) -> i64 {
        match self {
            EstablishmentCause::Emergency => 0,
            EstablishmentCause::MoSignalling => 1,
            EstablishmentCause::MoData => 2,
            EstablishmentCause::MoVoiceCall => 3,
            EstablishmentCause::MtAccess => 4,
        }
    }

    fn from_code(code: i64) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(EstablishmentCause::Emergency),
            1 => Ok(EstablishmentCause::MoSignalling),
            2 => Ok(EstablishmentCause::MoData),
            3 => Ok(EstablishmentCause::MoVoiceCall),
            4 => Ok(EstablishmentCause::MtAccess),
            other => Err(DecodeError::InvalidDiscriminant(other as u64, "EstablishmentCause")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrcSetupRequest {
    /// 39-bit `InitialUeIdentity` (5gS-TMSI-Part1 or a random value),
    /// held as 5 octets.
    pub ue_identity: [u8; 5],
    pub establishment_cause: EstablishmentCause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UlCcchMessage {
    RrcSetupRequest(RrcSetupRequest),
}

impl Encode for UlCcchMessage {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        match self {
            UlCcchMessage::RrcSetupRequest(r) => {
                w.write_constrained_int(0, 0, 1)?;
                w.write_bytes(&r.ue_identity);
                w.write_constrained_int(r.establishment_cause.to_code(), 0, 4)?;
            }
        }
        Ok(())
    }
}

impl Decode for UlCcchMessage {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        match r.read_constrained_int(0, 1)? {
            0 => {
                let bytes = r.read_bytes(5)?;
                let mut ue_identity = [0u8; 5];
                ue_identity.copy_from_slice(&bytes);
                let cause = EstablishmentCause::from_code(r.read_constrained_int(0, 4)?)?;
                Ok(UlCcchMessage::RrcSetupRequest(RrcSetupRequest { ue_identity, establishment_cause: cause }))
            }
            other => Err(DecodeError::InvalidDiscriminant(other as u64, "UlCcchMessage")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrcTransactionIdentifier(pub u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrcSetup {
    pub rrc_transaction_identifier: RrcTransactionIdentifier,
    /// Encoded `CellGroupConfig` (opaque to the message layer).
    pub cell_group_config: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DlCcchMessage {
    RrcSetup(RrcSetup),
}

impl Encode for DlCcchMessage {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        match self {
            DlCcchMessage::RrcSetup(s) => {
                w.write_constrained_int(0, 0, 0)?;
                w.write_constrained_int(s.rrc_transaction_identifier.0 as i64, 0, 3)?;
                w.write_octet_string(&s.cell_group_config);
            }
        }
        Ok(())
    }
}

impl Decode for DlCcchMessage {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        r.read_constrained_int(0, 0)?;
        let rrc_transaction_identifier = RrcTransactionIdentifier(r.read_constrained_int(0, 3)? as u8);
        let cell_group_config = r.read_octet_string()?;
        Ok(DlCcchMessage::RrcSetup(RrcSetup { rrc_transaction_identifier, cell_group_config }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrcSetupComplete {
    pub rrc_transaction_identifier: RrcTransactionIdentifier,
    pub selected_plmn_identity: u8,
    pub dedicated_nas_message: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityModeComplete {
    pub rrc_transaction_identifier: RrcTransactionIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrcReconfigurationComplete {
    pub rrc_transaction_identifier: RrcTransactionIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UlInformationTransfer {
    pub dedicated_nas_message: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UlDcchMessage {
    RrcSetupComplete(RrcSetupComplete),
    SecurityModeComplete(SecurityModeComplete),
    RrcReconfigurationComplete(RrcReconfigurationComplete),
    UlInformationTransfer(UlInformationTransfer),
}

impl Encode for UlDcchMessage {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        match self {
            UlDcchMessage::RrcSetupComplete(m) => {
                w.write_constrained_int(0, 0, 3)?;
                w.write_constrained_int(m.rrc_transaction_identifier.0 as i64, 0, 3)?;
                w.write_constrained_int(m.selected_plmn_identity as i64, 0, 255)?;
                w.write_octet_string(&m.dedicated_nas_message);
            }
            UlDcchMessage::SecurityModeComplete(m) => {
                w.write_constrained_int(1, 0, 3)?;
                w.write_constrained_int(m.rrc_transaction_identifier.0 as i64, 0, 3)?;
            }
            UlDcchMessage::RrcReconfigurationComplete(m) => {
                w.write_constrained_int(2, 0, 3)?;
                w.write_constrained_int(m.rrc_transaction_identifier.0 as i64, 0, 3)?;
            }
            UlDcchMessage::UlInformationTransfer(m) => {
                w.write_constrained_int(3, 0, 3)?;
                write_opt_bytes(w, &m.dedicated_nas_message);
            }
        }
        Ok(())
    }
}

impl Decode for UlDcchMessage {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        match r.read_constrained_int(0, 3)? {
            0 => {
                let rrc_transaction_identifier = RrcTransactionIdentifier(r.read_constrained_int(0, 3)? as u8);
                let selected_plmn_identity = r.read_constrained_int(0, 255)? as u8;
                let dedicated_nas_message = r.read_octet_string()?;
                Ok(UlDcchMessage::RrcSetupComplete(RrcSetupComplete {
                    rrc_transaction_identifier,
                    selected_plmn_identity,
                    dedicated_nas_message,
                }))
            }
            1 => {
                let rrc_transaction_identifier = RrcTransactionIdentifier(r.read_constrained_int(0, 3)? as u8);
                Ok(UlDcchMessage::SecurityModeComplete(SecurityModeComplete { rrc_transaction_identifier }))
            }
            2 => {
                let rrc_transaction_identifier = RrcTransactionIdentifier(r.read_constrained_int(0, 3)? as u8);
                Ok(UlDcchMessage::RrcReconfigurationComplete(RrcReconfigurationComplete {
                    rrc_transaction_identifier,
                }))
            }
            3 => {
                let dedicated_nas_message = read_opt_bytes(r)?;
                Ok(UlDcchMessage::UlInformationTransfer(UlInformationTransfer { dedicated_nas_message }))
            }
            other => Err(DecodeError::InvalidDiscriminant(other as u64, "UlDcchMessage")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityModeCommand {
    pub rrc_transaction_identifier: RrcTransactionIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrcReconfiguration {
    pub rrc_transaction_identifier: RrcTransactionIdentifier,
    /// Encoded `RadioBearerConfig` (DRBs to add/modify/release, security config).
    pub radio_bearer_config: Option<Vec<u8>>,
    pub master_cell_group: Option<Vec<u8>>,
    pub dedicated_nas_message_list: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlInformationTransfer {
    pub dedicated_nas_message: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DlDcchMessage {
    SecurityModeCommand(SecurityModeCommand),
    RrcReconfiguration(RrcReconfiguration),
    DlInformationTransfer(DlInformationTransfer),
}

impl Encode for DlDcchMessage {
    fn encode(&self, w: &mut BitWriter) -> Result<(), EncodeError> {
        match self {
            DlDcchMessage::SecurityModeCommand(m) => {
                w.write_constrained_int(0, 0, 2)?;
                w.write_constrained_int(m.rrc_transaction_identifier.0 as i64, 0, 3)?;
            }
            DlDcchMessage::RrcReconfiguration(m) => {
                w.write_constrained_int(1, 0, 2)?;
                w.write_constrained_int(m.rrc_transaction_identifier.0 as i64, 0, 3)?;
                write_opt_bytes(w, &m.radio_bearer_config);
                write_opt_bytes(w, &m.master_cell_group);
                w.write_constrained_int(m.dedicated_nas_message_list.len() as i64, 0, 16)?;
                for nas in &m.dedicated_nas_message_list {
                    w.write_octet_string(nas);
                }
            }
            DlDcchMessage::DlInformationTransfer(m) => {
                w.write_constrained_int(2, 0, 2)?;
                write_opt_bytes(w, &m.dedicated_nas_message);
            }
        }
        Ok(())
    }
}

impl Decode for DlDcchMessage {
    fn decode(r: &mut BitReader) -> Result<Self, DecodeError> {
        match r.read_constrained_int(0, 2)? {
            0 => {
                let rrc_transaction_identifier = RrcTransactionIdentifier(r.read_constrained_int(0, 3)? as u8);
                Ok(DlDcchMessage::SecurityModeCommand(SecurityModeCommand { rrc_transaction_identifier }))
            }
            1 => {
                let rrc_transaction_identifier = RrcTransactionIdentifier(r.read_constrained_int(0, 3)? as u8);
                let radio_bearer_config = read_opt_bytes(r)?;
                let master_cell_group = read_opt_bytes(r)?;
                let n = r.read_constrained_int(0, 16)?;
                let mut dedicated_nas_message_list = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    dedicated_nas_message_list.push(r.read_octet_string()?);
                }
                Ok(DlDcchMessage::RrcReconfiguration(RrcReconfiguration {
                    rrc_transaction_identifier,
                    radio_bearer_config,
                    master_cell_group,
                    dedicated_nas_message_list,
                }))
            }
            2 => {
                let dedicated_nas_message = read_opt_bytes(r)?;
                Ok(DlDcchMessage::DlInformationTransfer(DlInformationTransfer { dedicated_nas_message }))
            }
            other => Err(DecodeError::InvalidDiscriminant(other as u64, "DlDcchMessage")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use asn1_per::{pack, unpack};

    #[test]
    fn rrc_setup_request_round_trips() {
        let msg = UlCcchMessage::RrcSetupRequest(RrcSetupRequest {
            ue_identity: [1, 2, 3, 4, 5],
            establishment_cause: EstablishmentCause::MtAccess,
        });
        let bytes = pack(&msg).unwrap();
        let back: UlCcchMessage = unpack(&bytes).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn rrc_reconfiguration_round_trips_with_nas_list() {
        let msg = DlDcchMessage::RrcReconfiguration(RrcReconfiguration {
            rrc_transaction_identifier: RrcTransactionIdentifier(2),
            radio_bearer_config: Some(vec![1, 2]),
            master_cell_group: None,
            dedicated_nas_message_list: vec![vec![9, 9], vec![1]],
        });
        let bytes = pack(&msg).unwrap();
        let back: DlDcchMessage = unpack(&bytes).unwrap();
        assert_eq!(msg, back);
    }
}
