//! Let's Split, "pim" layout. Four layers: Qwerty base, Lower, Raise and
//! an Adjust layer reachable while Lower and Raise are both held.
//!
//! Grid orientation: row r, column c follows the physical listing, left
//! half in columns 0..=6, right half in columns 7..=13. Mouse and media
//! transport slots on the Adjust layer have no keyboard-page usage and are
//! left as no-ops; those reports belong to the mouse and consumer
//! interfaces of the firmware binary.

use usbd_human_interface_device::page::Keyboard as K;

use crate::keyboard::key::{Action, LayerCmd};
use crate::keyboard::keymap::{ConfigError, Keymap};
use crate::keyboard::layers::TriLayerRule;

pub const ROWS: usize = 5;
pub const COLS: usize = 14;
pub const LAYERS: usize = 4;

pub const QWERTY_LAYER: u8 = 0;
pub const LOWER_LAYER: u8 = 1;
pub const RAISE_LAYER: u8 = 2;
pub const ADJUST_LAYER: u8 = 3;

pub const TRI_LAYER_RULES: [TriLayerRule; 1] = [TriLayerRule {
    lower: LOWER_LAYER,
    upper: RAISE_LAYER,
    result: ADJUST_LAYER,
}];

/// The four custom keys of this layout.
pub const QWERTY: Action = Action::DefaultLayer(QWERTY_LAYER);
pub const LOWER: Action = Action::Layer(LayerCmd::Momentary(LOWER_LAYER));
pub const RAISE: Action = Action::Layer(LayerCmd::Momentary(RAISE_LAYER));
pub const ADJ: Action = Action::Layer(LayerCmd::Momentary(ADJUST_LAYER));

// Fillers to make layering more clear.
const __: Action = Action::Transparent;
const XX: Action = Action::NoOp;
const RST: Action = Action::Reset;

const fn k(code: K) -> Action {
    Action::Code(code)
}

type Grid = [[Action; COLS]; ROWS];

const QWERTY_GRID: Grid = [
    [k(K::Grave), k(K::Keyboard1), k(K::Keyboard2), k(K::Keyboard3), k(K::Keyboard4), k(K::Keyboard5), k(K::LeftArrow), k(K::UpArrow), k(K::Keyboard6), k(K::Keyboard7), k(K::Keyboard8), k(K::Keyboard9), k(K::Keyboard0), k(K::Backslash)],
    [k(K::Tab), k(K::Q), k(K::W), k(K::E), k(K::R), k(K::T), k(K::RightArrow), k(K::DownArrow), k(K::Y), k(K::U), k(K::I), k(K::O), k(K::P), k(K::DeleteBackspace)],
    [k(K::Escape), k(K::A), k(K::S), k(K::D), k(K::F), k(K::G), k(K::Minus), k(K::Equal), k(K::H), k(K::J), k(K::K), k(K::L), k(K::Semicolon), k(K::Apostrophe)],
    [k(K::LeftShift), k(K::Z), k(K::X), k(K::C), k(K::V), k(K::B), k(K::ReturnEnter), k(K::ReturnEnter), k(K::N), k(K::M), k(K::Comma), k(K::Dot), k(K::ForwardSlash), k(K::RightShift)],
    [k(K::LeftControl), ADJ, LOWER, RAISE, k(K::LeftAlt), k(K::LeftBrace), k(K::LeftGUI), k(K::Space), k(K::RightBrace), k(K::RightGUI), RAISE, LOWER, k(K::RightControl), ADJ],
];

const LOWER_GRID: Grid = [
    [k(K::F1), k(K::F2), k(K::F3), k(K::F4), k(K::F5), k(K::F6), __, k(K::PageUp), k(K::F7), k(K::F8), k(K::F9), k(K::F10), k(K::F11), k(K::F12)],
    [__, __, __, __, __, __, __, k(K::PageDown), k(K::KeypadNumLockAndClear), k(K::Keypad7), k(K::Keypad8), k(K::Keypad9), k(K::DeleteBackspace), k(K::DeleteForward)],
    [k(K::CapsLock), __, __, __, __, __, __, __, __, k(K::Keypad4), k(K::Keypad5), k(K::Keypad6), k(K::Backslash), k(K::Insert)],
    [k(K::LeftShift), __, __, __, __, __, k(K::Space), k(K::ReturnEnter), __, k(K::Keypad1), k(K::Keypad2), k(K::Keypad3), __, k(K::RightShift)],
    [k(K::LeftControl), ADJ, LOWER, RAISE, k(K::LeftAlt), __, k(K::LeftGUI), k(K::Space), __, k(K::Keypad0), __, k(K::KeypadDot), __, ADJ],
];

const RAISE_GRID: Grid = [
    [k(K::F1), k(K::F2), k(K::F3), k(K::F4), k(K::F5), k(K::F6), __, k(K::PageUp), k(K::F7), k(K::F8), k(K::F9), k(K::F10), k(K::F11), k(K::F12)],
    [__, __, __, __, k(K::Backslash), k(K::Keyboard6), __, k(K::PageDown), __, k(K::PageDown), k(K::PageUp), __, __, k(K::DeleteBackspace)],
    [k(K::CapsLock), __, __, __, __, __, __, __, k(K::LeftArrow), k(K::DownArrow), k(K::UpArrow), k(K::RightArrow), __, __],
    [k(K::LeftShift), __, __, __, __, __, k(K::Space), k(K::Home), __, __, __, __, __, __],
    [k(K::LeftControl), ADJ, LOWER, RAISE, k(K::LeftAlt), __, k(K::LeftGUI), k(K::End), __, __, __, __, __, ADJ],
];

const ADJUST_GRID: Grid = [
    [RST, __, k(K::Mute), k(K::VolumeDown), k(K::VolumeUp), __, __, XX, __, __, __, __, __, RST],
    [__, __, __, __, __, __, __, XX, __, __, XX, __, __, k(K::DeleteBackspace)],
    [__, __, XX, XX, XX, __, __, XX, __, XX, XX, XX, XX, __],
    [k(K::LeftShift), __, __, __, __, __, k(K::Space), XX, XX, XX, XX, XX, XX, __],
    [k(K::LeftControl), ADJ, LOWER, RAISE, k(K::LeftAlt), __, k(K::LeftGUI), XX, XX, __, __, __, __, ADJ],
];

pub fn keymap() -> Result<Keymap<ROWS, COLS, LAYERS>, ConfigError> {
    Keymap::new([QWERTY_GRID, LOWER_GRID, RAISE_GRID, ADJUST_GRID])
}
