use anyhow::{Context, Result};

use crate::keymap::{KeyCode, SymbolTable};
use crate::surface::TextSurface;

pub const DEFAULT_SEPARATOR: &str = " ";

/// Renderable key name with its width measured once at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: String,
    width: u32,
}

impl Label {
    pub fn new(text: impl Into<String>, width: u32) -> Self {
        Self {
            text: text.into(),
            width,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

/// Turns key codes into labels using the platform symbol table.
pub struct KeyLabelResolver<T> {
    symbols: T,
    separator: String,
}

impl<T: SymbolTable> KeyLabelResolver<T> {
    pub fn new(symbols: T) -> Self {
        Self::with_separator(symbols, DEFAULT_SEPARATOR)
    }

    pub fn with_separator(symbols: T, separator: impl Into<String>) -> Self {
        Self {
            symbols,
            separator: separator.into(),
        }
    }

    /// `Ok(None)` for codes without a symbol. Measurement failures are
    /// returned as errors.
    pub fn resolve<S>(&self, code: KeyCode, surface: &S) -> Result<Option<Label>>
    where
        S: TextSurface + ?Sized,
    {
        let Some(name) = self.symbols.symbol_name(code) else {
            tracing::trace!(%code, "no symbol for key code");
            return Ok(None);
        };
        let text = format!("{name}{}", self.separator);
        let width = surface
            .measure_text(&text)
            .with_context(|| format!("measure label {text:?} for key code {code}"))?;
        Ok(Some(Label { text, width }))
    }
}
