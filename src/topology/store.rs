//! Persistent topology store.
//!
//! Holds every router declared so far, keyed by name, and persists them as
//! a JSON array. Saves go through a temporary file in the target directory
//! followed by a rename, so a failed save never leaves a half-written store.

use super::types::Router;
use crate::error::TopologyError;
use ipnet::Ipv6Net;
use log::{debug, info};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct TopologyStore {
    path: PathBuf,
    routers: BTreeMap<String, Router>,
}

impl TopologyStore {
    /// Empty store persisted at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TopologyStore {
            path: path.into(),
            routers: BTreeMap::new(),
        }
    }

    /// Read the store at `path`, or start empty if the file does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, TopologyError> {
        let path = path.into();
        if !path.exists() {
            info!("No topology store at {:?}, starting empty", path);
            return Ok(Self::new(path));
        }

        let content = fs::read_to_string(&path).map_err(|e| TopologyError::io(&path, e))?;
        let routers: Vec<Router> = serde_json::from_str(&content).map_err(|e| TopologyError::CorruptStore {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let store = Self::from_routers(path, routers)?;
        info!("Loaded {} routers from {:?}", store.len(), store.path);
        Ok(store)
    }

    /// Build a store from a list of records, rejecting duplicate names
    pub fn from_routers(path: impl Into<PathBuf>, routers: Vec<Router>) -> Result<Self, TopologyError> {
        let mut store = Self::new(path);
        for router in routers {
            if store.contains(&router.name) {
                return Err(TopologyError::CorruptStore {
                    path: store.path.clone(),
                    reason: format!("router {} appears more than once", router.name),
                });
            }
            store.routers.insert(router.name.clone(), router);
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&Router> {
        self.routers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    pub fn routers(&self) -> impl Iterator<Item = &Router> {
        self.routers.values()
    }

    /// Insert `router`, replacing any record with the same name.
    ///
    /// The caller is expected to hand over an already merged record.
    pub fn upsert(&mut self, router: Router) -> Option<Router> {
        self.routers.insert(router.name.clone(), router)
    }

    /// Every link subnet present on any interface in the store
    pub fn used_subnets(&self) -> HashSet<Ipv6Net> {
        self.routers()
            .flat_map(|router| router.interfaces.iter())
            .map(|iface| iface.subnet())
            .collect()
    }

    /// Write the store back to the path it was loaded from
    pub fn save(&self) -> Result<(), TopologyError> {
        self.save_to(&self.path)
    }

    /// Atomically write the store as a JSON array to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), TopologyError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.is_dir() {
            return Err(TopologyError::MissingTopologyPath { path: dir.to_path_buf() });
        }

        let routers: Vec<&Router> = self.routers().collect();
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| TopologyError::io(dir, e))?;
        // The replacement keeps the mode of the store it replaces
        if let Ok(metadata) = fs::metadata(path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| TopologyError::io(path, e))?;
        }
        serde_json::to_writer_pretty(&mut tmp, &routers).map_err(|e| TopologyError::io(path, e.into()))?;
        tmp.write_all(b"\n").map_err(|e| TopologyError::io(path, e))?;
        tmp.persist(path).map_err(|e| TopologyError::io(path, e.error))?;

        debug!("Saved {} routers to {:?}", routers.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::types::{EbgpPeer, Igp, Interface, InterfaceType};
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn sample_router(num: u8) -> Router {
        let mut router = Router::new(
            format!("R{}", num),
            10,
            Ipv4Addr::new(1, 1, 1, num),
            format!("2001:192:100:255::{}/128", num).parse().unwrap(),
            Igp::Rip,
        );
        router.interfaces.push(Interface {
            peer: "R9".to_string(),
            local_ip: format!("2001:192:170:{}::1/64", num).parse().unwrap(),
            peer_ip: format!("2001:192:170:{}::2/64", num).parse().unwrap(),
            kind: InterfaceType::Ebgp,
        });
        router.ibgp_peers.push("R5".to_string());
        router.ebgp_peers.push(EbgpPeer { peer: "R9".to_string(), peer_as: 20 });
        router
    }

    #[test]
    fn test_missing_store_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = TopologyStore::load(dir.path().join("routers.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routers.json");

        let mut store = TopologyStore::new(&path);
        store.upsert(sample_router(6));
        store.upsert(sample_router(4));
        store.save().unwrap();

        let loaded = TopologyStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("R6"), store.get("R6"));
        assert_eq!(loaded.get("R4"), store.get("R4"));

        // Saving what was loaded reproduces the same file
        let first = fs::read_to_string(&path).unwrap();
        loaded.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_upsert_replaces_by_name() {
        let mut store = TopologyStore::new("routers.json");
        assert!(store.upsert(sample_router(6)).is_none());

        let mut updated = sample_router(6);
        updated.ibgp_peers.push("R7".to_string());
        let previous = store.upsert(updated.clone()).unwrap();

        assert_eq!(previous.ibgp_peers, vec!["R5"]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("R6"), Some(&updated));
    }

    #[test]
    fn test_corrupt_store_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routers.json");

        fs::write(&path, r#"{"name": "R1"}"#).unwrap();
        assert!(matches!(TopologyStore::load(&path), Err(TopologyError::CorruptStore { .. })));

        fs::write(&path, r#"[{"name": "R1", "as_number": 10}]"#).unwrap();
        assert!(matches!(TopologyStore::load(&path), Err(TopologyError::CorruptStore { .. })));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = TopologyStore::from_routers("routers.json", vec![sample_router(1), sample_router(1)]).unwrap_err();
        assert!(err.to_string().contains("R1 appears more than once"));
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("routers.json");

        let store = TopologyStore::new(&path);
        assert!(matches!(store.save(), Err(TopologyError::MissingTopologyPath { .. })));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routers.json");
        fs::write(&path, "[]\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = TopologyStore::load(&path).unwrap();
        store.upsert(sample_router(1));
        store.save().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(TopologyStore::load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_used_subnets() {
        let mut store = TopologyStore::new("routers.json");
        store.upsert(sample_router(1));
        store.upsert(sample_router(2));

        let used = store.used_subnets();
        assert_eq!(used.len(), 2);
        assert!(used.contains(&"2001:192:170:1::/64".parse().unwrap()));
    }
}
