//! Network interface discovery.
//!
//! # Data Flow
//! ```text
//! getifaddrs (OS)
//!     → interface.rs (group addresses by interface, keep OS order)
//!     → Vec<InterfaceRecord> (immutable snapshot, taken once at startup)
//!     → watch supervisor + status service
//! ```
//!
//! # Design Decisions
//! - No filtering: loopback and down interfaces are watched too
//! - Interfaces appearing later are not discovered

pub mod hostname;
pub mod interface;

pub use interface::{
    EnumerationError, InterfaceFlags, InterfaceRecord, InterfaceSnapshot, InterfaceSource,
    MacAddress, SystemInterfaces,
};
