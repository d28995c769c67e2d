use serde::{Deserialize, Serialize};

use super::snapshot::{KeyCode, Snapshot};

/// How rising edges are reported when several keys sharing one byte of the
/// bitmask go down between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Every newly pressed key is reported.
    #[default]
    AllRising,
    /// At most one key per byte is reported: the lowest newly pressed bit.
    /// Other keys that went down in the same byte during the same tick are
    /// dropped and will not be reported while they stay held.
    LowestPerByte,
}

/// Key codes that went from released to pressed between `previous` and
/// `current`, ascending.
///
/// Keys held in both snapshots and keys that were released produce nothing.
pub fn diff(current: &Snapshot, previous: &Snapshot, policy: EdgePolicy) -> Vec<KeyCode> {
    let mut pressed = Vec::new();
    let pairs = current.as_bytes().iter().zip(previous.as_bytes().iter());
    for (byte, (&cur, &prev)) in pairs.enumerate() {
        let mut rising = cur & !prev;
        while rising != 0 {
            let bit = rising.trailing_zeros();
            if let Some(code) = KeyCode::from_position(byte, bit) {
                pressed.push(code);
            }
            if policy == EdgePolicy::LowestPerByte {
                break;
            }
            // clear lowest set bit
            rising &= rising - 1;
        }
    }
    pressed
}

/// Holds the snapshot from the previous tick so each sample is compared
/// against the one immediately before it.
#[derive(Debug, Clone, Default)]
pub struct KeymapSampler {
    previous: Snapshot,
    policy: EdgePolicy,
}

impl KeymapSampler {
    pub fn new(policy: EdgePolicy) -> Self {
        Self {
            previous: Snapshot::empty(),
            policy,
        }
    }

    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }

    /// Rising edges since the last tick. `current` becomes the new previous
    /// snapshot.
    pub fn tick(&mut self, current: Snapshot) -> Vec<KeyCode> {
        let pressed = diff(&current, &self.previous, self.policy);
        self.previous = current;
        pressed
    }

    /// Forget the previous snapshot; keys already held will be reported
    /// again on the next tick.
    pub fn reset(&mut self) {
        self.previous = Snapshot::empty();
    }
}
