pub mod key;
pub mod keyboard;
pub mod keymap;
pub mod layers;
pub mod models;
