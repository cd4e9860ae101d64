//! Resolve and apply the front end's process identity.

use tracing::{debug, warn};

use crate::domain::identity::{FRONT_END_HOST_ID, FRONT_END_PROCESS_NAME};
use crate::domain::ProcessIdentity;

/// Identity of the current process in the front-end role.
#[must_use]
pub fn resolve() -> ProcessIdentity {
    ProcessIdentity::new(
        FRONT_END_HOST_ID,
        host_name(),
        FRONT_END_PROCESS_NAME,
        std::process::id(),
        process_group(),
    )
}

fn process_group() -> i32 {
    // SAFETY: getpgid(0) only reads the calling process's group id.
    unsafe { libc::getpgid(0) }
}

fn host_name() -> String {
    let mut buf = [0u8; 256];
    // SAFETY: buf is valid for buf.len() bytes for the duration of the call.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        warn!(error = %std::io::Error::last_os_error(), "gethostname failed");
        return "localhost".to_string();
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Set the kernel-visible name of the current thread's process.
///
/// Linux truncates names to 15 bytes. A no-op on other platforms.
pub fn set_process_name(name: &str) {
    #[cfg(target_os = "linux")]
    {
        let Ok(name) = std::ffi::CString::new(name) else {
            warn!(name, "process name contains a NUL byte");
            return;
        };
        // SAFETY: PR_SET_NAME reads a NUL-terminated string that outlives the call.
        let rc = unsafe { libc::prctl(libc::PR_SET_NAME, name.as_ptr(), 0, 0, 0) };
        if rc != 0 {
            warn!(error = %std::io::Error::last_os_error(), "prctl(PR_SET_NAME) failed");
        } else {
            debug!(name = ?name, "Process name set");
        }
    }
    #[cfg(not(target_os = "linux"))]
    debug!(name, "Process naming unsupported on this platform");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_current_process() {
        let identity = resolve();
        assert_eq!(identity.host_id(), FRONT_END_HOST_ID);
        assert_eq!(identity.process_name(), FRONT_END_PROCESS_NAME);
        assert_eq!(identity.pid(), std::process::id());
        assert!(identity.pgid() > 0);
        assert!(!identity.host_name().is_empty());
    }
}
