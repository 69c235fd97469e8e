//! Start the embedded PostgreSQL cluster used by the repository suite.
//!
//! Unless the caller already set both `PG_RUNTIME_DIR` and `PG_DATA_DIR`,
//! the cluster gets a private install and data directory under the cargo
//! target dir. The variables are held through `env-lock` only while the
//! cluster boots.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP: Mutex<()> = Mutex::new(());

/// Delays before each retry of a failed download.
const BACKOFF: [Duration; 3] = [
    Duration::from_millis(500),
    Duration::from_secs(1),
    Duration::from_secs(2),
];

const TRANSIENT: [&str; 7] = [
    "error decoding response body",
    "connection reset",
    "connection refused",
    "timed out",
    "timeout",
    "temporarily unavailable",
    "dns error",
];

struct ClusterDirs {
    install: PathBuf,
    data: PathBuf,
}

impl ClusterDirs {
    fn create_under(root: &Path) -> std::io::Result<Self> {
        let base = root.join(format!("notes-{}-{}", std::process::id(), Uuid::new_v4()));
        let dirs = Self {
            install: base.join("install"),
            data: base.join("data"),
        };
        std::fs::create_dir_all(&dirs.install)?;
        std::fs::create_dir_all(&dirs.data)?;
        Ok(dirs)
    }

    fn env(&self) -> [(&'static str, Option<String>); 2] {
        [
            ("PG_RUNTIME_DIR", Some(self.install.display().to_string())),
            ("PG_DATA_DIR", Some(self.data.display().to_string())),
        ]
    }
}

fn scratch_root() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../target"))
        .join("pg-embed")
}

fn is_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT.iter().any(|needle| message.contains(needle))
}

fn start_with_retries() -> Result<TestCluster, String> {
    let mut delays = BACKOFF.iter();
    loop {
        let message = match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => format!("{err:?}"),
        };
        match delays.next() {
            Some(delay) if is_transient(&message) => {
                eprintln!("pg-embed: cluster start failed, retrying in {delay:?}: {message}");
                thread::sleep(*delay);
            }
            _ => return Err(message),
        }
    }
}

/// Boot a [`TestCluster`], retrying transient download failures.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _serial = BOOTSTRAP.lock().unwrap_or_else(|err| err.into_inner());

    let preset =
        std::env::var_os("PG_RUNTIME_DIR").is_some() && std::env::var_os("PG_DATA_DIR").is_some();
    let _env = if preset {
        None
    } else {
        let dirs = ClusterDirs::create_under(&scratch_root()).map_err(|err| err.to_string())?;
        Some(env_lock::lock_env(dirs.env()))
    };

    start_with_retries()
}
