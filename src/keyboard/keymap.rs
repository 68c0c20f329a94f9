use super::key::{Action, LayerCmd};

/// Out-of-range reference in the static configuration tables. Fatal at
/// startup; the engine never reports these at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A `Layer`/`DefaultLayer` slot targets a layer the keymap does not define.
    KeymapLayerOutOfRange { layer: u8, row: u8, col: u8 },
    DefaultLayerOutOfRange { layer: u8 },
    TriLayerOutOfRange { layer: u8 },
    TooManyTriLayerRules,
}

/// The keycode table: one action grid per layer, fixed at startup.
#[derive(Debug)]
pub struct Keymap<const ROWS: usize, const COLS: usize, const LAYERS: usize> {
    layers: [[[Action; COLS]; ROWS]; LAYERS],
}

impl<const ROWS: usize, const COLS: usize, const LAYERS: usize> Keymap<ROWS, COLS, LAYERS> {
    /// Validates every layer reference in the grids. A bad table is a
    /// build mistake, so initialization halts rather than limping on.
    pub fn new(layers: [[[Action; COLS]; ROWS]; LAYERS]) -> Result<Self, ConfigError> {
        for grid in layers.iter() {
            for (row, actions) in grid.iter().enumerate() {
                for (col, action) in actions.iter().enumerate() {
                    let target = match action {
                        Action::Layer(LayerCmd::Momentary(l)) => Some(*l),
                        Action::Layer(LayerCmd::Toggle(l)) => Some(*l),
                        Action::DefaultLayer(l) => Some(*l),
                        _ => None,
                    };
                    if let Some(layer) = target {
                        if layer as usize >= LAYERS {
                            return Err(ConfigError::KeymapLayerOutOfRange {
                                layer,
                                row: row as u8,
                                col: col as u8,
                            });
                        }
                    }
                }
            }
        }
        Ok(Keymap { layers })
    }

    /// Total over the matrix for every defined layer.
    pub fn action(&self, layer: usize, row: usize, col: usize) -> Action {
        self.layers[layer][row][col]
    }

    pub fn contains(&self, row: u8, col: u8) -> bool {
        (row as usize) < ROWS && (col as usize) < COLS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usbd_human_interface_device::page::Keyboard as Kc;

    #[test]
    fn accepts_in_range_layer_targets() {
        let keymap: Keymap<1, 2, 2> = Keymap::new([
            [[Action::Code(Kc::A), Action::Layer(LayerCmd::Momentary(1))]],
            [[Action::Transparent, Action::Transparent]],
        ])
        .unwrap();
        assert_eq!(keymap.action(0, 0, 0), Action::Code(Kc::A));
        assert_eq!(keymap.action(1, 0, 1), Action::Transparent);
    }

    #[test]
    fn rejects_momentary_target_out_of_range() {
        let err = Keymap::<1, 2, 2>::new([
            [[Action::NoOp, Action::Layer(LayerCmd::Momentary(5))]],
            [[Action::Transparent, Action::Transparent]],
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::KeymapLayerOutOfRange { layer: 5, row: 0, col: 1 }
        );
    }

    #[test]
    fn rejects_default_layer_target_out_of_range() {
        let err = Keymap::<1, 1, 1>::new([[[Action::DefaultLayer(1)]]]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::KeymapLayerOutOfRange { layer: 1, row: 0, col: 0 }
        );
    }

    #[test]
    fn bounds_check() {
        let keymap: Keymap<2, 3, 1> = Keymap::new([[[Action::NoOp; 3]; 2]]).unwrap();
        assert!(keymap.contains(1, 2));
        assert!(!keymap.contains(2, 0));
        assert!(!keymap.contains(0, 3));
    }
}
