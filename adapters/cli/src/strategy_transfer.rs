#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use grid_defence_core::{GenomeError, StrategyGenome, TowerKind};
use serde::{Deserialize, Serialize};

const SHARE_DOMAIN: &str = "strat";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded genome payload.
pub(crate) const SHARE_HEADER: &str = "strat:v1";
/// Delimiter used to separate the prefix, tower kind and payload.
const FIELD_DELIMITER: char = ':';

/// Tuned strategy genome paired with the tower kind it was evolved for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StrategyShareCode {
    /// Kind whose bounds table the genome was validated against.
    pub kind: TowerKind,
    /// The tuned genome itself.
    pub genome: StrategyGenome,
}

impl StrategyShareCode {
    /// Encodes the genome into a single-line string suitable for clipboard
    /// transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let [accuracy, cooldown_ms, range, damage, crit_chance] = self.genome.to_values();
        let payload = SerializableGenome {
            accuracy,
            cooldown_ms,
            range,
            damage,
            crit_chance,
        };
        let json = serde_json::to_vec(&payload).expect("genome serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SHARE_HEADER}:{}:{encoded}", kind_label(self.kind))
    }

    /// Decodes a share code, re-validating the genome against the embedded
    /// kind's bounds so a tampered payload cannot smuggle illegal values in.
    pub(crate) fn decode(value: &str) -> Result<Self, StrategyTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(StrategyTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(StrategyTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(StrategyTransferError::MissingVersion)?;
        let kind = parts.next().ok_or(StrategyTransferError::MissingKind)?;
        let payload = parts.next().ok_or(StrategyTransferError::MissingPayload)?;

        if domain != SHARE_DOMAIN {
            return Err(StrategyTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SHARE_VERSION {
            return Err(StrategyTransferError::UnsupportedVersion(
                version.to_owned(),
            ));
        }

        let kind =
            parse_kind(kind).ok_or_else(|| StrategyTransferError::UnknownKind(kind.to_owned()))?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(StrategyTransferError::InvalidEncoding)?;
        let decoded: SerializableGenome =
            serde_json::from_slice(&bytes).map_err(StrategyTransferError::InvalidPayload)?;

        let genome = StrategyGenome::from_values(
            kind,
            [
                decoded.accuracy,
                decoded.cooldown_ms,
                decoded.range,
                decoded.damage,
                decoded.crit_chance,
            ],
        )
        .map_err(StrategyTransferError::InvalidGenome)?;

        Ok(Self { kind, genome })
    }
}

/// Lower-case kind segment used within share codes.
pub(crate) fn kind_label(kind: TowerKind) -> &'static str {
    match kind {
        TowerKind::Basic => "basic",
        TowerKind::Rapid => "rapid",
        TowerKind::Siege => "siege",
    }
}

fn parse_kind(value: &str) -> Option<TowerKind> {
    match value {
        "basic" => Some(TowerKind::Basic),
        "rapid" => Some(TowerKind::Rapid),
        "siege" => Some(TowerKind::Siege),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableGenome {
    accuracy: f32,
    cooldown_ms: f32,
    range: f32,
    damage: f32,
    crit_chance: f32,
}

/// Errors that can occur while decoding strategy share codes.
#[derive(Debug)]
pub(crate) enum StrategyTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded genome.
    MissingPrefix,
    /// The encoded genome did not contain a version segment.
    MissingVersion,
    /// The encoded genome did not include a tower kind.
    MissingKind,
    /// The encoded genome did not include the payload segment.
    MissingPayload,
    /// The encoded genome used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded genome used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The tower kind segment was not recognised.
    UnknownKind(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The decoded values violate the kind's strategy bounds.
    InvalidGenome(GenomeError),
}

impl fmt::Display for StrategyTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "share code was empty"),
            Self::MissingPrefix => write!(f, "share code is missing the prefix"),
            Self::MissingVersion => write!(f, "share code is missing the version"),
            Self::MissingKind => write!(f, "share code is missing the tower kind"),
            Self::MissingPayload => write!(f, "share code is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "share prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "share version '{version}' is not supported")
            }
            Self::UnknownKind(kind) => write!(f, "tower kind '{kind}' is not recognised"),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode genome payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse genome payload: {error}")
            }
            Self::InvalidGenome(error) => {
                write!(f, "decoded genome is not admissible: {error}")
            }
        }
    }
}

impl Error for StrategyTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            Self::InvalidGenome(error) => Some(error),
            _ => None,
        }
    }
}
