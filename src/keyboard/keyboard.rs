//! The event dispatcher: turns matrix transitions into HID traffic and
//! layer-stack changes.

use usbd_human_interface_device::page::Keyboard as Kc;

use crate::eeprom::DefaultLayerStore;
use crate::{info, warn};

use super::key::{Action, KeyEvent, LayerCmd};
use super::keymap::{ConfigError, Keymap};
use super::layers::{LayerState, TriLayerRule};

/// One transition per scan tick, `None` when the matrix is quiet.
pub trait EventSource {
    fn next_event(&mut self) -> Option<KeyEvent>;
}

/// HID output. Fire-and-forget; the engine never looks at the result.
pub trait HidSink {
    fn key_down(&mut self, code: Kc);
    fn key_up(&mut self, code: Kc);
}

/// Jump to the bootloader. Never returns on hardware; test doubles just
/// record the call.
pub trait ResetTrigger {
    fn trigger_reset(&mut self);
}

/// Engine state for one keyboard. Owns the keymap, the layer stack and
/// the per-position memory of what each held key resolved to at press
/// time.
///
/// Layers may change between a key's press and its release, so the
/// release path replays the action remembered at press time instead of
/// resolving again. Re-resolving would desync the HID state: a key-down
/// sent from one layer must be matched by the same key-up even if the
/// layer went away while the key was held.
pub struct Keyboard<const ROWS: usize, const COLS: usize, const LAYERS: usize> {
    keymap: Keymap<ROWS, COLS, LAYERS>,
    layers: LayerState<LAYERS>,
    held: [[Option<Action>; COLS]; ROWS],
}

impl<const ROWS: usize, const COLS: usize, const LAYERS: usize> Keyboard<ROWS, COLS, LAYERS> {
    /// Loads the persisted default layer and builds the engine. A stored
    /// layer outside the keymap (stale image after a firmware change)
    /// falls back to layer 0 rather than failing startup.
    pub fn new(
        keymap: Keymap<ROWS, COLS, LAYERS>,
        tri_rules: &[TriLayerRule],
        store: &mut impl DefaultLayerStore,
    ) -> Result<Self, ConfigError> {
        let mut default_layer = store.load_default_layer();
        if default_layer as usize >= LAYERS {
            warn!("stored default layer {} out of range", default_layer);
            default_layer = 0;
        }
        let layers = LayerState::new(default_layer, tri_rules)?;
        Ok(Keyboard {
            keymap,
            layers,
            held: [[None; COLS]; ROWS],
        })
    }

    pub fn layers(&self) -> &LayerState<LAYERS> {
        &self.layers
    }

    pub fn keymap(&self) -> &Keymap<ROWS, COLS, LAYERS> {
        &self.keymap
    }

    /// Pulls one event from the scan loop and dispatches it. Runs to
    /// completion before the next tick; nothing here blocks.
    pub fn poll(
        &mut self,
        source: &mut impl EventSource,
        hid: &mut impl HidSink,
        store: &mut impl DefaultLayerStore,
        reset: &mut impl ResetTrigger,
    ) {
        if let Some(event) = source.next_event() {
            self.handle_event(event, hid, store, reset);
        }
    }

    pub fn handle_event(
        &mut self,
        event: KeyEvent,
        hid: &mut impl HidSink,
        store: &mut impl DefaultLayerStore,
        reset: &mut impl ResetTrigger,
    ) {
        if !self.keymap.contains(event.row, event.col) {
            warn!("event outside matrix ({}, {})", event.row, event.col);
            return;
        }
        if event.pressed {
            self.on_press(event.row as usize, event.col as usize, hid, store, reset);
        } else {
            self.on_release(event.row as usize, event.col as usize, hid);
        }
    }

    fn on_press(
        &mut self,
        row: usize,
        col: usize,
        hid: &mut impl HidSink,
        store: &mut impl DefaultLayerStore,
        reset: &mut impl ResetTrigger,
    ) {
        let action = self.layers.resolve(&self.keymap, row, col);
        self.held[row][col] = Some(action);
        match action {
            Action::Code(code) => {
                info!("pressed {}", code as u8);
                hid.key_down(code);
            }
            Action::Layer(LayerCmd::Momentary(layer)) => {
                self.layers.activate(layer);
                self.layers.update_tri_layers(layer);
            }
            Action::Layer(LayerCmd::Toggle(layer)) => {
                self.layers.toggle(layer);
                self.layers.update_tri_layers(layer);
            }
            Action::DefaultLayer(layer) => {
                info!("default layer set to {}", layer);
                self.layers.set_default(layer, store);
            }
            Action::Reset => {
                reset.trigger_reset();
            }
            Action::NoOp | Action::Transparent => {}
        }
    }

    fn on_release(&mut self, row: usize, col: usize, hid: &mut impl HidSink) {
        // Replay what was resolved at press time, then forget it. A
        // release with no remembered press (half reconnect, missed scan)
        // is dropped.
        let action = match self.held[row][col].take() {
            Some(action) => action,
            None => return,
        };
        match action {
            Action::Code(code) => {
                info!("released {}", code as u8);
                hid.key_up(code);
            }
            Action::Layer(LayerCmd::Momentary(layer)) => {
                self.layers.deactivate(layer);
                self.layers.update_tri_layers(layer);
            }
            // Toggle latched at press; default-layer and reset acted at
            // press; nothing owes a release.
            _ => {}
        }
    }
}
