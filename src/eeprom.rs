//! Default-layer persistence.
//!
//! The engine only ever persists one byte of state: the chosen default
//! layer. The record is guarded by a mark byte so a blank or foreign
//! EEPROM image falls back to layer 0 instead of activating garbage.
//! Storage failures are logged and swallowed; a key press must never fail
//! because the EEPROM did.

use crate::{info, warn};

/// What the layer stack needs from non-volatile storage.
pub trait DefaultLayerStore {
    /// Returns the persisted default layer, or a fallback when storage is
    /// uninitialized or unreadable.
    fn load_default_layer(&mut self) -> u8;
    /// Best effort; failures are logged, not propagated.
    fn store_default_layer(&mut self, layer: u8);
}

/// Raw byte access, implemented by the firmware over its EEPROM driver.
pub trait ByteStorage {
    type Error;
    fn read_byte(&mut self, address: u32) -> Result<u8, Self::Error>;
    fn write_byte(&mut self, address: u32, byte: u8) -> Result<(), Self::Error>;
}

pub const EEPROM_MARK: u8 = 0xAB;
pub const FALLBACK_LAYER: u8 = 0;

const MARK_ADDRESS: u32 = 0;
const LAYER_ADDRESS: u32 = 1;

/// Mark-byte record `[EEPROM_MARK, layer]` over raw storage.
pub struct EepromStore<S> {
    storage: S,
}

impl<S: ByteStorage> EepromStore<S> {
    pub fn new(storage: S) -> Self {
        EepromStore { storage }
    }

    /// Clears the mark so the next boot starts from the fallback layer.
    pub fn reset(&mut self) {
        if self.storage.write_byte(MARK_ADDRESS, 0).is_err() {
            warn!("eeprom reset write error");
        }
    }
}

impl<S: ByteStorage> DefaultLayerStore for EepromStore<S> {
    fn load_default_layer(&mut self) -> u8 {
        match self.storage.read_byte(MARK_ADDRESS) {
            Ok(EEPROM_MARK) => match self.storage.read_byte(LAYER_ADDRESS) {
                Ok(layer) => {
                    info!("default layer {} loaded", layer);
                    layer
                }
                Err(_) => {
                    warn!("eeprom read error");
                    FALLBACK_LAYER
                }
            },
            Ok(_) => {
                info!("no mark found");
                FALLBACK_LAYER
            }
            Err(_) => {
                warn!("eeprom read error");
                FALLBACK_LAYER
            }
        }
    }

    fn store_default_layer(&mut self, layer: u8) {
        let write = self
            .storage
            .write_byte(MARK_ADDRESS, EEPROM_MARK)
            .and_then(|_| self.storage.write_byte(LAYER_ADDRESS, layer));
        if write.is_err() {
            warn!("eeprom write error");
        }
    }
}
