//! Resident memory of the current process.

use std::io;
use sysinfo::System;
use tracing::{debug, warn};

fn rusage() -> io::Result<libc::rusage> {
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(usage)
}

/// Peak resident set size, in bytes. Zero if the kernel won't say.
pub fn peak() -> u64 {
    match rusage() {
        // macOS reports bytes, everything else KiB.
        Ok(usage) if cfg!(target_os = "macos") => usage.ru_maxrss as u64,
        Ok(usage) => usage.ru_maxrss as u64 * 1024,
        Err(err) => {
            warn!(%err, "getrusage failed");
            0
        }
    }
}

/// Current resident set size, in bytes. Zero if the process can't be found.
pub fn current() -> u64 {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(err) => {
            warn!(err, "cannot resolve own pid");
            return 0;
        }
    };
    let mut sys = System::new();
    if !sys.refresh_process(pid) {
        warn!(%pid, "process refresh failed");
        return 0;
    }
    sys.process(pid).map(|process| process.memory()).unwrap_or(0)
}

fn address_space_limit() -> io::Result<libc::rlimit> {
    let mut lim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    if unsafe { libc::getrlimit(libc::RLIMIT_AS, &mut lim) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(lim)
}

/// The soft address-space cap currently in force, `None` if unlimited.
pub fn cap() -> Option<u64> {
    match address_space_limit() {
        Ok(lim) if lim.rlim_cur == libc::RLIM_INFINITY => None,
        Ok(lim) => Some(lim.rlim_cur as u64),
        Err(err) => {
            warn!(%err, "getrlimit failed");
            None
        }
    }
}

/// Caps the address space of this process at `bytes`. The hard limit is
/// left alone, so a cap above it is refused. Returns whether the cap is now
/// in force.
pub fn limit(bytes: u64) -> bool {
    let mut lim = match address_space_limit() {
        Ok(lim) => lim,
        Err(err) => {
            warn!(%err, "getrlimit failed");
            return false;
        }
    };
    let wanted = bytes as libc::rlim_t;
    if lim.rlim_max != libc::RLIM_INFINITY && wanted > lim.rlim_max {
        warn!(bytes, hard = lim.rlim_max as u64, "memory cap above hard limit");
        return false;
    }
    lim.rlim_cur = wanted;
    if unsafe { libc::setrlimit(libc::RLIMIT_AS, &lim) } != 0 {
        warn!(err = %io::Error::last_os_error(), bytes, "setrlimit failed");
        return false;
    }
    debug!(bytes, "memory cap installed");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_is_nonzero() {
        let _buf = vec![1u8; 1 << 20];
        assert!(peak() > 0);
    }

    #[test]
    fn current_never_exceeds_peak() {
        let now = current();
        assert!(now > 0);
        assert!(now <= peak());
    }

    #[test]
    fn current_tracks_touched_pages() {
        const LEN: usize = 64 << 20;
        let before = current();
        let buf = vec![1u8; LEN];
        let after = current();
        assert_eq!(buf[LEN - 1], 1);
        assert!(after >= before + (LEN as u64) / 2, "{} -> {}", before, after);
    }

    #[test]
    fn reinstalling_current_cap() {
        let before = cap();
        assert!(limit(before.unwrap_or(u64::MAX)));
        assert_eq!(cap(), before);
    }
}
