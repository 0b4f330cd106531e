//! Per-request render context.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::network::InterfaceRecord;
use crate::store::StoreSet;

/// Everything a template can see.
///
/// Built fresh for every request from the interface snapshot and the current
/// contents of each registered store.
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
    pub interfaces: &'a [InterfaceRecord],
    pub stores: Map<String, Value>,
    /// Name of the template being rendered.
    pub template: &'a str,
}

impl<'a> RenderContext<'a> {
    pub fn capture(interfaces: &'a [InterfaceRecord], stores: &StoreSet, template: &'a str) -> Self {
        Self {
            interfaces,
            stores: stores.snapshot(),
            template,
        }
    }
}
