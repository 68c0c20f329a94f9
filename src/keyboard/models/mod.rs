#[cfg(feature = "model_lets_split")]
pub mod lets_split;
