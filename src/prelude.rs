pub use core::fmt::Debug;
pub use hashbrown::HashMap;

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        log::info!("[ds402] {}", alloc::format!($($arg)*));
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!("[ds402] {}", alloc::format!($($arg)*));
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        log::error!("[ds402] {}", alloc::format!($($arg)*));
    };
}
