use std::fmt;

/// Number of bytes in a keyboard state bitmask (`XQueryKeymap` returns 32).
pub const SNAPSHOT_BYTES: usize = 32;

/// Hardware key code. Snapshots cover 256 codes, so a `u8` holds every
/// index a snapshot can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyCode(pub u8);

impl KeyCode {
    /// Build a key code from a byte index and a bit index within that byte.
    ///
    /// Returns `None` when either index falls outside the snapshot.
    pub fn from_position(byte: usize, bit: u32) -> Option<Self> {
        if byte >= SNAPSHOT_BYTES || bit >= u8::BITS {
            return None;
        }
        u8::try_from(byte * 8 + bit as usize).ok().map(KeyCode)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical key state at one instant. Bit `n` of byte `n / 8` is set while
/// key code `n` is held down.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    bytes: [u8; SNAPSHOT_BYTES],
}

impl Snapshot {
    pub const fn empty() -> Self {
        Self {
            bytes: [0; SNAPSHOT_BYTES],
        }
    }

    pub const fn from_bytes(bytes: [u8; SNAPSHOT_BYTES]) -> Self {
        Self { bytes }
    }

    /// Snapshot with exactly the given codes held.
    pub fn with_pressed<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = KeyCode>,
    {
        let mut snapshot = Self::empty();
        for code in codes {
            snapshot.set(code, true);
        }
        snapshot
    }

    pub fn as_bytes(&self) -> &[u8; SNAPSHOT_BYTES] {
        &self.bytes
    }

    pub fn is_pressed(&self, code: KeyCode) -> bool {
        let (byte, mask) = locate(code);
        self.bytes[byte] & mask != 0
    }

    pub fn set(&mut self, code: KeyCode, pressed: bool) {
        let (byte, mask) = locate(code);
        if pressed {
            self.bytes[byte] |= mask;
        } else {
            self.bytes[byte] &= !mask;
        }
    }

    pub fn pressed_count(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }

    /// Codes held in this snapshot, ascending.
    pub fn pressed(&self) -> impl Iterator<Item = KeyCode> + '_ {
        (0..=u8::MAX)
            .map(KeyCode)
            .filter(move |code| self.is_pressed(*code))
    }
}

fn locate(code: KeyCode) -> (usize, u8) {
    (code.index() / 8, 1u8 << (code.0 % 8))
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.pressed().map(|c| c.0)).finish()
    }
}
