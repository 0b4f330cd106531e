//! Local hostname lookup.

use std::io;

/// Hostname of this machine, queried fresh on every call.
#[cfg(unix)]
pub fn local_hostname() -> io::Result<String> {
    let name = nix::unistd::gethostname().map_err(io::Error::from)?;
    Ok(name.to_string_lossy().into_owned())
}

#[cfg(not(unix))]
pub fn local_hostname() -> io::Result<String> {
    std::env::var("COMPUTERNAME").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))
}
