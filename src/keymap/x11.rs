//! Xlib keyboard backend: `XQueryKeymap` for state, XKB for symbol names.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

use anyhow::{anyhow, Result};
use x11::xlib;

use super::backend::{KeyboardState, SymbolTable};
use super::snapshot::{KeyCode, Snapshot, SNAPSHOT_BYTES};

/// Connection to the X server used for keyboard polling.
pub struct X11Keyboard {
    display: *mut xlib::Display,
}

impl X11Keyboard {
    /// Open the display named by `$DISPLAY`.
    pub fn open() -> Result<Self> {
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(anyhow!("can't open X display"));
        }
        tracing::debug!("opened X display for keymap polling");
        Ok(Self { display })
    }
}

impl KeyboardState for X11Keyboard {
    fn sample(&self) -> Result<Snapshot> {
        let mut keys = [0 as c_char; SNAPSHOT_BYTES];
        // XQueryKeymap always returns 1
        unsafe {
            xlib::XQueryKeymap(self.display, keys.as_mut_ptr());
        }
        let mut bytes = [0u8; SNAPSHOT_BYTES];
        for (dst, src) in bytes.iter_mut().zip(keys.iter()) {
            *dst = *src as u8;
        }
        Ok(Snapshot::from_bytes(bytes))
    }
}

impl SymbolTable for X11Keyboard {
    fn symbol_name(&self, code: KeyCode) -> Option<String> {
        // group 0, level 0: the unshifted symbol
        let keysym = unsafe { xlib::XkbKeycodeToKeysym(self.display, code.0, 0, 0) };
        if keysym == 0 {
            return None;
        }
        let name = unsafe { xlib::XKeysymToString(keysym) };
        if name.is_null() {
            return None;
        }
        let name = unsafe { CStr::from_ptr(name) };
        Some(name.to_string_lossy().into_owned())
    }
}

impl Drop for X11Keyboard {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.display);
        }
    }
}
