//! Test helpers for writing instance files into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use cvrp_core::{City, InstanceSpec, LatLon};
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

/// A temporary directory that is removed when dropped.
pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Two customers near a depot in north-east Paris.
pub(super) fn paris_spec(capacity: f64, max_vehicles: usize) -> InstanceSpec {
    InstanceSpec {
        depot: LatLon {
            lat: 48.9566,
            lon: 2.4753,
        },
        capacity,
        max_vehicles,
        cities: vec![City::new(48.96, 2.48, 1.0), City::new(48.95, 2.46, 1.0)],
    }
}

pub(super) fn write_instance(path: &Utf8Path, spec: &InstanceSpec) {
    let payload = serde_json::to_string_pretty(spec).expect("serialize instance");
    write_utf8(path, payload.as_bytes());
}
