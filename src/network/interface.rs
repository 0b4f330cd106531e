//! Network interface enumeration.
//!
//! # Responsibilities
//! - Query the OS for every interface (name, index, MAC, flags, addresses)
//! - Preserve the order the OS reports them in
//! - Abstract the query behind `InterfaceSource` so callers can be tested

use std::fmt;
use std::io;
use std::net::IpAddr;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Error type for interface enumeration.
#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    /// The OS query itself failed.
    #[error("failed to query network interfaces: {0}")]
    Query(#[from] io::Error),
    /// No enumeration backend exists for this platform.
    #[error("interface enumeration is not supported on this platform")]
    Unsupported,
}

/// A 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Interface state flags as reported at enumeration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceFlags {
    pub up: bool,
    pub broadcast: bool,
    pub loopback: bool,
    pub point_to_point: bool,
    pub multicast: bool,
    pub running: bool,
}

impl InterfaceFlags {
    fn names(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.up, "up"),
            (self.broadcast, "broadcast"),
            (self.loopback, "loopback"),
            (self.point_to_point, "pointtopoint"),
            (self.multicast, "multicast"),
            (self.running, "running"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }
}

impl fmt::Display for InterfaceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Identity of one network interface, captured once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    /// OS interface index (0 when the OS did not report one).
    pub index: u32,
    pub name: String,
    pub hardware_addr: Option<MacAddress>,
    pub flags: InterfaceFlags,
    pub addresses: Vec<IpAddr>,
}

impl InterfaceRecord {
    pub fn new(index: u32, name: impl Into<String>, flags: InterfaceFlags) -> Self {
        Self {
            index,
            name: name.into(),
            hardware_addr: None,
            flags,
            addresses: Vec::new(),
        }
    }
}

/// Shared, read-only list of interfaces.
pub type InterfaceSnapshot = Arc<[InterfaceRecord]>;

/// Anything that can list the host's interfaces.
pub trait InterfaceSource: Send + Sync {
    fn enumerate(&self) -> Result<Vec<InterfaceRecord>, EnumerationError>;
}

impl<T: InterfaceSource + ?Sized> InterfaceSource for Arc<T> {
    fn enumerate(&self) -> Result<Vec<InterfaceRecord>, EnumerationError> {
        (**self).enumerate()
    }
}

/// The operating system's interface table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn enumerate(&self) -> Result<Vec<InterfaceRecord>, EnumerationError> {
        enumerate()
    }
}

/// Query the OS for the current list of interfaces.
#[cfg(unix)]
pub fn enumerate() -> Result<Vec<InterfaceRecord>, EnumerationError> {
    use nix::ifaddrs::getifaddrs;
    use nix::net::if_::{if_nametoindex, InterfaceFlags as Raw};

    let addrs = getifaddrs().map_err(io::Error::from)?;
    let mut records: Vec<InterfaceRecord> = Vec::new();

    for ifaddr in addrs {
        let pos = match records.iter().position(|r| r.name == ifaddr.interface_name) {
            Some(pos) => pos,
            None => {
                let flags = InterfaceFlags {
                    up: ifaddr.flags.contains(Raw::IFF_UP),
                    broadcast: ifaddr.flags.contains(Raw::IFF_BROADCAST),
                    loopback: ifaddr.flags.contains(Raw::IFF_LOOPBACK),
                    point_to_point: ifaddr.flags.contains(Raw::IFF_POINTOPOINT),
                    multicast: ifaddr.flags.contains(Raw::IFF_MULTICAST),
                    running: ifaddr.flags.contains(Raw::IFF_RUNNING),
                };
                let index = if_nametoindex(ifaddr.interface_name.as_str()).unwrap_or(0);
                records.push(InterfaceRecord::new(index, ifaddr.interface_name.clone(), flags));
                records.len() - 1
            }
        };

        let Some(address) = ifaddr.address else {
            continue;
        };
        let record = &mut records[pos];

        if let Some(v4) = address.as_sockaddr_in() {
            record.addresses.push(IpAddr::V4(v4.ip()));
        } else if let Some(v6) = address.as_sockaddr_in6() {
            record.addresses.push(IpAddr::V6(v6.ip()));
        } else if let Some(mac) = address.as_link_addr().and_then(|link| link.addr()) {
            let mac = MacAddress(mac);
            if !mac.is_zero() {
                record.hardware_addr = Some(mac);
            }
        }
    }

    tracing::debug!(count = records.len(), "Enumerated network interfaces");
    Ok(records)
}

#[cfg(not(unix))]
pub fn enumerate() -> Result<Vec<InterfaceRecord>, EnumerationError> {
    Err(EnumerationError::Unsupported)
}
