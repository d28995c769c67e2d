use anyhow::Result;

use super::snapshot::{KeyCode, Snapshot};

/// Source of full-keyboard state snapshots.
pub trait KeyboardState {
    fn sample(&self) -> Result<Snapshot>;
}

/// Maps a hardware key code to its base-level symbol name.
///
/// Modifier, group and shift level are not consulted; `Shift` + `a` still
/// resolves to `a`.
pub trait SymbolTable {
    /// `None` when the code has no symbol on the active layout.
    fn symbol_name(&self, code: KeyCode) -> Option<String>;
}

impl<T: KeyboardState + ?Sized> KeyboardState for &T {
    fn sample(&self) -> Result<Snapshot> {
        (**self).sample()
    }
}

impl<T: SymbolTable + ?Sized> SymbolTable for &T {
    fn symbol_name(&self, code: KeyCode) -> Option<String> {
        (**self).symbol_name(code)
    }
}
