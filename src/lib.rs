//! Layer engine for a split keyboard.
//!
//! This crate holds the board-independent half of the firmware: the keymap
//! tables, the layer stack with tri-layer combination, the press/release
//! dispatcher and the default-layer persistence format. Matrix scanning,
//! USB HID transport and the EEPROM driver live in the firmware binary and
//! reach the engine through the traits in [`keyboard::keyboard`] and
//! [`eeprom`].

#![cfg_attr(not(test), no_std)]

mod macros;

pub mod eeprom;
pub mod keyboard;

pub use eeprom::{ByteStorage, DefaultLayerStore, EepromStore};
pub use keyboard::key::{Action, KeyEvent, LayerCmd};
pub use keyboard::keyboard::{EventSource, HidSink, Keyboard, ResetTrigger};
pub use keyboard::keymap::{ConfigError, Keymap};
pub use keyboard::layers::{LayerState, TriLayerRule};
