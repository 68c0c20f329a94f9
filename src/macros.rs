//! Logging shim. Forwards to `defmt` on target and to `log` on host; with
//! neither feature enabled the macros expand to nothing. Call sites must
//! stick to `{}` with primitive arguments so both backends accept the
//! format string.

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(all(not(feature = "defmt"), feature = "log"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { ::log::info!($($arg)*) };
}

#[cfg(all(not(feature = "defmt"), not(feature = "log")))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(all(not(feature = "defmt"), feature = "log"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { ::log::warn!($($arg)*) };
}

#[cfg(all(not(feature = "defmt"), not(feature = "log")))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}
