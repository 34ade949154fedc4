//! Replay tokens: a compact, copy-pasteable encoding of a counterexample.
//!
//! The payload is a versioned record of seed, size, waypoint and shrink
//! path, serialized with bincode's varint encoding and then encoded as
//! URL-safe base64 without padding.

use crate::data::{GenParameters, Size};
use crate::error::{GauntletError, Result};
use crate::rng::Rng;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fmt;

const VERSION: u8 = 1;

/// What goes over the wire.
#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    version: u8,
    seed: u64,
    size: u8,
    waypoint: Option<u64>,
    path: Vec<u64>,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_varint_encoding()
        .reject_trailing_bytes()
}

/// Everything needed to regenerate a counterexample without searching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub seed: u64,
    pub size: Size,
    pub waypoint: Option<u64>,
    /// Child indices from the generated root to the counterexample.
    pub path: Vec<usize>,
}

impl Replay {
    pub fn new(seed: u64, size: Size, waypoint: Option<u64>, path: Vec<usize>) -> Self {
        Replay {
            seed,
            size,
            waypoint,
            path,
        }
    }

    /// Capture the parameters an iteration was generated from.
    pub fn from_parameters(parameters: &GenParameters, path: Vec<usize>) -> Self {
        Replay::new(
            parameters.rng.seed(),
            parameters.size,
            parameters.waypoint.map(|waypoint| waypoint.seed()),
            path,
        )
    }

    /// The parameters to regenerate the root from.
    pub fn parameters(&self) -> GenParameters {
        GenParameters::create(self.seed, self.size)
            .with_waypoint(self.waypoint.map(Rng::create))
    }

    pub fn encode(&self) -> String {
        let payload = Payload {
            version: VERSION,
            seed: self.seed,
            size: self.size.get() as u8,
            waypoint: self.waypoint,
            path: self.path.iter().map(|&index| index as u64).collect(),
        };
        // Serializing into memory without a size limit cannot fail.
        let bytes = options().serialize(&payload).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    pub fn decode(token: &str) -> Result<Replay> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|error| GauntletError::replay_decode(token, error.to_string()))?;
        let payload: Payload = options()
            .deserialize(&bytes)
            .map_err(|error| GauntletError::replay_decode(token, error.to_string()))?;

        if payload.version != VERSION {
            return Err(GauntletError::replay_decode(
                token,
                format!("unsupported version {}", payload.version),
            ));
        }
        if payload.size as usize > Size::MAX.get() {
            return Err(GauntletError::replay_decode(
                token,
                format!("size {} is out of range", payload.size),
            ));
        }

        let path = payload
            .path
            .into_iter()
            .map(|index| {
                usize::try_from(index).map_err(|_| {
                    GauntletError::replay_decode(
                        token,
                        format!("path entry {index} does not fit in usize"),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Replay::new(
            payload.seed,
            Size::new(payload.size as usize),
            payload.waypoint,
            path,
        ))
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
