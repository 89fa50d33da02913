//! OS-specific pieces. Only log-file opening differs between platforms today.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::open_log_file_secure_append;
#[cfg(not(unix))]
pub use windows::open_log_file_secure_append;
