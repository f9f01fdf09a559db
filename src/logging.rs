//! Журналирование через defmt
//!
//! Прошивка пишет журнал через `defmt` (транспорт RTT на плате). Библиотека
//! собирается и без `defmt` (тесты на хосте): тогда макросы ниже ничего не
//! выводят, но аргументы остаются "использованными".

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{ let _ = ($fmt, $(&$arg),*); }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{ let _ = ($fmt, $(&$arg),*); }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{ let _ = ($fmt, $(&$arg),*); }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{ let _ = ($fmt, $(&$arg),*); }};
}

#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { ::defmt::trace!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! log_trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{ let _ = ($fmt, $(&$arg),*); }};
}
