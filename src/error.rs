use std::cell::RefCell;
use std::ffi::CString;

/// Errors produced by the kinematics engine and the telemetry client.
#[derive(Debug, thiserror::Error)]
pub enum ArmkinError {
    #[error("Invalid input: expected {expected} joint angles, got {actual}")]
    InvalidInput { expected: usize, actual: usize },

    #[error("Joint index {index} out of range (table has {len} joints)")]
    OutOfRange { index: usize, len: usize },

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid packet: expected {expected} bytes, got {actual}")]
    InvalidPacket { expected: usize, actual: usize },

    #[error("Invalid link geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Pose stream stopped")]
    StreamStopped,

    #[error("Timeout waiting for data")]
    Timeout,
}

thread_local! {
    static LAST_ERROR_MESSAGE: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Per-thread last-error storage for the C FFI layer.
///
/// A pointer from [`LastError::as_ptr`] stays valid until the next error is
/// recorded on the same thread.
pub(crate) struct LastError;

impl LastError {
    pub const fn new() -> Self {
        Self
    }

    pub fn set(&self, err: &ArmkinError) {
        let msg = CString::new(err.to_string().replace('\0', " ")).unwrap_or_default();
        LAST_ERROR_MESSAGE.with(|cell| *cell.borrow_mut() = Some(msg));
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        LAST_ERROR_MESSAGE.with(|cell| match cell.borrow().as_ref() {
            Some(msg) => msg.as_ptr(),
            None => std::ptr::null(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_error_is_nul_terminated() {
        let last = LastError::new();
        assert!(last.as_ptr().is_null());

        last.set(&ArmkinError::OutOfRange { index: 7, len: 6 });
        let msg = unsafe { std::ffi::CStr::from_ptr(last.as_ptr()) };
        assert_eq!(
            msg.to_str().unwrap(),
            "Joint index 7 out of range (table has 6 joints)"
        );
    }

    #[test]
    fn test_last_error_is_per_thread() {
        let last = LastError::new();
        last.set(&ArmkinError::Timeout);
        let ptr = last.as_ptr();

        std::thread::spawn(|| {
            let other = LastError::new();
            assert!(other.as_ptr().is_null());
            other.set(&ArmkinError::StreamStopped);
            assert!(!other.as_ptr().is_null());
        })
        .join()
        .unwrap();

        assert_eq!(last.as_ptr(), ptr);
        let msg = unsafe { std::ffi::CStr::from_ptr(ptr) };
        assert_eq!(msg.to_str().unwrap(), "Timeout waiting for data");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy");
        let err: ArmkinError = io.into();
        assert!(matches!(err, ArmkinError::Io(_)));
    }
}
