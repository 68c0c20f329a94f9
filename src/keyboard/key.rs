use usbd_human_interface_device::page::Keyboard as Kc;

/// How a layer key drives the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerCmd {
    /// Active while the key is physically held.
    Momentary(u8),
    /// Latches on each press, independent of hold duration.
    Toggle(u8),
}

/// What one keymap slot does. Adding a variant forces every dispatch
/// site to be revisited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// No mapping on this layer; consult the next lower active layer.
    Transparent,
    NoOp,
    Code(Kc),
    Layer(LayerCmd),
    /// Replace the persisted default layer.
    DefaultLayer(u8),
    /// Jump to the bootloader. Never returns on hardware.
    Reset,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Action {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Action::Transparent => defmt::write!(f, "trns"),
            Action::NoOp => defmt::write!(f, "nop"),
            Action::Code(k) => defmt::write!(f, "k {}", *k as u8),
            Action::Layer(LayerCmd::Momentary(l)) => defmt::write!(f, "mo {}", l),
            Action::Layer(LayerCmd::Toggle(l)) => defmt::write!(f, "tg {}", l),
            Action::DefaultLayer(l) => defmt::write!(f, "df {}", l),
            Action::Reset => defmt::write!(f, "rst"),
        }
    }
}

/// One matrix transition, as delivered by the scan loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn press(row: u8, col: u8) -> Self {
        KeyEvent { row, col, pressed: true }
    }
    pub const fn release(row: u8, col: u8) -> Self {
        KeyEvent { row, col, pressed: false }
    }
}
