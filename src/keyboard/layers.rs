use heapless::Vec;

use crate::eeprom::DefaultLayerStore;
use crate::warn;

use super::key::Action;
use super::keymap::{ConfigError, Keymap};

pub const MAX_TRI_RULES: usize = 4;

/// `result` is active exactly while both `lower` and `upper` are. The
/// result layer is recomputed after every stack change, never toggled on
/// its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriLayerRule {
    pub lower: u8,
    pub upper: u8,
    pub result: u8,
}

/// The layer stack: one persisted default layer plus transiently active
/// layers in activation order. The default layer is always active and
/// always loses to any transient layer; among transients the most
/// recently activated wins.
#[derive(Clone, Debug)]
pub struct LayerState<const LAYERS: usize> {
    default_layer: u8,
    stack: Vec<u8, LAYERS>,
    tri_rules: Vec<TriLayerRule, MAX_TRI_RULES>,
}

impl<const LAYERS: usize> LayerState<LAYERS> {
    pub fn new(default_layer: u8, tri_rules: &[TriLayerRule]) -> Result<Self, ConfigError> {
        if default_layer as usize >= LAYERS {
            return Err(ConfigError::DefaultLayerOutOfRange { layer: default_layer });
        }
        let mut rules = Vec::new();
        for rule in tri_rules {
            for layer in [rule.lower, rule.upper, rule.result] {
                if layer as usize >= LAYERS {
                    return Err(ConfigError::TriLayerOutOfRange { layer });
                }
            }
            rules
                .push(*rule)
                .map_err(|_| ConfigError::TooManyTriLayerRules)?;
        }
        Ok(LayerState {
            default_layer,
            stack: Vec::new(),
            tri_rules: rules,
        })
    }

    pub fn default_layer(&self) -> u8 {
        self.default_layer
    }

    pub fn is_active(&self, layer: u8) -> bool {
        layer == self.default_layer || self.stack.contains(&layer)
    }

    /// Highest precedence first, default layer last. Never empty.
    pub fn active_layers(&self) -> impl Iterator<Item = u8> + '_ {
        self.stack
            .iter()
            .rev()
            .copied()
            .chain(core::iter::once(self.default_layer))
    }

    /// Idempotent: re-activating keeps the layer's precedence slot.
    pub fn activate(&mut self, layer: u8) {
        if layer as usize >= LAYERS {
            warn!("activate: layer {} out of range", layer);
            return;
        }
        if self.is_active(layer) {
            return;
        }
        // Capacity is LAYERS and entries are unique, so this cannot fail.
        let _ = self.stack.push(layer);
    }

    /// No-op if the layer is not transiently active. The default layer is
    /// not removable; it only changes through `set_default`.
    pub fn deactivate(&mut self, layer: u8) {
        if let Some(i) = self.stack.iter().position(|l| *l == layer) {
            self.stack.remove(i);
        }
    }

    /// Latching flip for `LayerCmd::Toggle`. Latching the default layer is
    /// meaningless, it is already always active.
    pub fn toggle(&mut self, layer: u8) {
        if layer as usize >= LAYERS {
            warn!("toggle: layer {} out of range", layer);
            return;
        }
        if layer == self.default_layer {
            return;
        }
        match self.stack.iter().position(|l| *l == layer) {
            Some(i) => {
                self.stack.remove(i);
            }
            None => {
                let _ = self.stack.push(layer);
            }
        }
    }

    /// Replaces the default layer and persists the choice. Persistence is
    /// fire-and-forget: the store logs its own failures and the in-memory
    /// default takes effect regardless.
    pub fn set_default(&mut self, layer: u8, store: &mut impl DefaultLayerStore) {
        if layer as usize >= LAYERS {
            warn!("set_default: layer {} out of range", layer);
            return;
        }
        self.default_layer = layer;
        // If it was transiently active, fold it into the default slot.
        self.deactivate(layer);
        store.store_default_layer(layer);
    }

    /// Recomputes the tri-layer rules in which `changed` is a trigger,
    /// against the current active set. Idempotent and order-independent:
    /// which trigger changed first does not matter, only whether both are
    /// active now. Rules whose triggers did not change are left alone, so
    /// a result layer driven by its own momentary key stays up.
    pub fn update_tri_layers(&mut self, changed: u8) {
        let rules = self.tri_rules.clone();
        for rule in rules {
            if changed != rule.lower && changed != rule.upper {
                continue;
            }
            if self.is_active(rule.lower) && self.is_active(rule.upper) {
                self.activate(rule.result);
            } else {
                self.deactivate(rule.result);
            }
        }
    }

    /// First non-transparent action walking the active layers from highest
    /// precedence down. A fully transparent column resolves to `NoOp`.
    pub fn resolve<const ROWS: usize, const COLS: usize>(
        &self,
        keymap: &Keymap<ROWS, COLS, LAYERS>,
        row: usize,
        col: usize,
    ) -> Action {
        for layer in self.active_layers() {
            match keymap.action(layer as usize, row, col) {
                Action::Transparent => continue,
                action => return action,
            }
        }
        Action::NoOp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usbd_human_interface_device::page::Keyboard as Kc;

    struct NullStore {
        stored: Option<u8>,
    }

    impl DefaultLayerStore for NullStore {
        fn load_default_layer(&mut self) -> u8 {
            self.stored.unwrap_or(0)
        }
        fn store_default_layer(&mut self, layer: u8) {
            self.stored = Some(layer);
        }
    }

    const RULES: [TriLayerRule; 1] = [TriLayerRule { lower: 1, upper: 2, result: 3 }];

    fn state() -> LayerState<4> {
        LayerState::new(0, &RULES).unwrap()
    }

    fn active(state: &LayerState<4>) -> std::vec::Vec<u8> {
        state.active_layers().collect()
    }

    #[test]
    fn default_layer_always_active() {
        let state = state();
        assert_eq!(active(&state), [0]);
        assert!(state.is_active(0));
    }

    #[test]
    fn rejects_bad_configuration() {
        assert_eq!(
            LayerState::<4>::new(4, &[]).unwrap_err(),
            ConfigError::DefaultLayerOutOfRange { layer: 4 }
        );
        let bad = [TriLayerRule { lower: 1, upper: 9, result: 3 }];
        assert_eq!(
            LayerState::<4>::new(0, &bad).unwrap_err(),
            ConfigError::TriLayerOutOfRange { layer: 9 }
        );
    }

    #[test]
    fn activate_is_idempotent() {
        let mut state = state();
        state.activate(1);
        state.activate(2);
        let once = active(&state);
        state.activate(1);
        assert_eq!(active(&state), once);
        assert_eq!(once, [2, 1, 0]);
    }

    #[test]
    fn activate_out_of_range_is_rejected() {
        let mut state = state();
        state.activate(7);
        assert_eq!(active(&state), [0]);
    }

    #[test]
    fn deactivate_leaves_default_alone() {
        let mut state = state();
        state.activate(1);
        state.deactivate(0);
        state.deactivate(1);
        state.deactivate(1);
        assert_eq!(active(&state), [0]);
    }

    #[test]
    fn toggle_latches() {
        let mut state = state();
        state.toggle(2);
        assert!(state.is_active(2));
        state.toggle(2);
        assert!(!state.is_active(2));
    }

    #[test]
    fn tri_layer_tracks_both_triggers() {
        for order in [[1u8, 2], [2, 1]] {
            let mut state = state();
            for layer in order {
                state.activate(layer);
                state.update_tri_layers(layer);
            }
            assert!(state.is_active(3));
            state.deactivate(order[0]);
            state.update_tri_layers(order[0]);
            assert!(!state.is_active(3));
        }
    }

    #[test]
    fn tri_layer_update_is_idempotent() {
        let mut state = state();
        state.activate(1);
        state.update_tri_layers(1);
        state.activate(2);
        state.update_tri_layers(2);
        let once = active(&state);
        state.update_tri_layers(2);
        assert_eq!(active(&state), once);
        assert_eq!(once, [3, 2, 1, 0]);
    }

    #[test]
    fn directly_held_result_layer_is_not_revoked() {
        let mut state = state();
        // The result layer's own momentary key: activation must survive
        // the recompute even though neither trigger is active.
        state.activate(3);
        state.update_tri_layers(3);
        assert!(state.is_active(3));
        state.deactivate(3);
        state.update_tri_layers(3);
        assert!(!state.is_active(3));
    }

    #[test]
    fn set_default_replaces_and_persists() {
        let mut store = NullStore { stored: None };
        let mut state = state();
        state.activate(1);
        state.set_default(1, &mut store);
        assert_eq!(state.default_layer(), 1);
        assert_eq!(store.stored, Some(1));
        // Folded out of the transient stack into the default slot.
        assert_eq!(active(&state), [1]);
    }

    #[test]
    fn resolve_walks_precedence_and_falls_through() {
        let keymap: Keymap<1, 2, 4> = Keymap::new([
            [[Action::Code(Kc::A), Action::Code(Kc::B)]],
            [[Action::Code(Kc::X), Action::Transparent]],
            [[Action::Transparent, Action::Transparent]],
            [[Action::Transparent, Action::Transparent]],
        ])
        .unwrap();
        let mut state = state();
        assert_eq!(state.resolve(&keymap, 0, 0), Action::Code(Kc::A));
        state.activate(1);
        assert_eq!(state.resolve(&keymap, 0, 0), Action::Code(Kc::X));
        // Transparent on the held layer defers to the base layer.
        assert_eq!(state.resolve(&keymap, 0, 1), Action::Code(Kc::B));
    }

    #[test]
    fn resolve_all_transparent_is_noop() {
        let keymap: Keymap<1, 1, 4> = Keymap::new([
            [[Action::Transparent]],
            [[Action::Transparent]],
            [[Action::Transparent]],
            [[Action::Transparent]],
        ])
        .unwrap();
        let state = state();
        assert_eq!(state.resolve(&keymap, 0, 0), Action::NoOp);
    }
}
