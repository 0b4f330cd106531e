//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use locutus::config::StatusConfig;
use locutus::lifecycle::{AppContext, ShutdownSignal};
use locutus::network::{EnumerationError, InterfaceFlags, InterfaceRecord, InterfaceSource};
use locutus::watch::{WatchError, Watcher};
use tempfile::TempDir;

pub const INTERFACES_TEMPLATE: &str =
    "{% for iface in interfaces %}{{ iface.name }};{% endfor %}";
pub const SITE_CSS: &str = "body { color: black; }";

/// Template and asset directories on disk.
pub struct Fixture {
    _dir: TempDir,
    pub templates: PathBuf,
    pub assets: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        let assets = dir.path().join("assets");
        fs::create_dir_all(&templates).unwrap();
        fs::create_dir_all(assets.join("css")).unwrap();

        fs::write(templates.join("interfaces.html"), INTERFACES_TEMPLATE).unwrap();
        fs::write(
            templates.join("links.html"),
            "{% for link in stores.links %}{{ link.name }}={{ link.samples }};{% endfor %}",
        )
        .unwrap();
        fs::write(templates.join("clock.html"), "{{ time_now() }}").unwrap();
        fs::write(templates.join("host.html"), "{{ local_hostname() }}").unwrap();
        fs::write(templates.join("broken.html"), "{{ missing.field }}").unwrap();
        fs::write(assets.join("css").join("site.css"), SITE_CSS).unwrap();

        Self {
            _dir: dir,
            templates,
            assets,
        }
    }

    pub fn status_config(&self) -> StatusConfig {
        StatusConfig {
            bind_host: "127.0.0.1".to_string(),
            port: 0,
            assets_dir: self.assets.clone(),
            templates_dir: self.templates.clone(),
            default_template: "interfaces.html".to_string(),
        }
    }
}

pub fn record(index: u32, name: &str) -> InterfaceRecord {
    InterfaceRecord::new(
        index,
        name,
        InterfaceFlags {
            up: true,
            running: true,
            ..Default::default()
        },
    )
}

pub fn records(names: &[&str]) -> Vec<InterfaceRecord> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| record(i as u32 + 1, name))
        .collect()
}

/// Fixed interface list.
pub struct StaticSource(pub Vec<InterfaceRecord>);

impl InterfaceSource for StaticSource {
    fn enumerate(&self) -> Result<Vec<InterfaceRecord>, EnumerationError> {
        Ok(self.0.clone())
    }
}

/// An OS query that always fails.
pub struct FailingSource;

impl InterfaceSource for FailingSource {
    fn enumerate(&self) -> Result<Vec<InterfaceRecord>, EnumerationError> {
        Err(EnumerationError::Query(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "netlink denied",
        )))
    }
}

/// Behaviour is picked from the interface name prefix:
/// `panic-` panics, `err-` fails, `slow-` sleeps then succeeds, anything
/// else waits for the stop signal.
#[derive(Default)]
pub struct ScriptedWatcher {
    pub started: AtomicUsize,
    pub finished: AtomicUsize,
    pub seen: Mutex<Vec<String>>,
}

impl Watcher for ScriptedWatcher {
    async fn watch(&self, iface: &InterfaceRecord, mut stop: ShutdownSignal) -> Result<(), WatchError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(iface.name.clone());

        let result = if iface.name.starts_with("panic-") {
            panic!("watcher for {} exploded", iface.name);
        } else if iface.name.starts_with("err-") {
            Err(WatchError::Other(format!("capture failed on {}", iface.name)))
        } else if iface.name.starts_with("slow-") {
            tokio::time::sleep(Duration::from_millis(80)).await;
            Ok(())
        } else {
            stop.recv().await;
            Ok(())
        };

        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// Context whose fatal path records the exit code instead of exiting.
pub fn recording_context() -> (AppContext, Arc<AtomicI32>) {
    let code = Arc::new(AtomicI32::new(-1));
    let seen = code.clone();
    let ctx = AppContext::with_exit_hook(Arc::new(move |c| seen.store(c, Ordering::SeqCst)));
    (ctx, code)
}

/// In-memory log sink for scoped subscribers.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
