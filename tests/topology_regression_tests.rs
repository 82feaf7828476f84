#[cfg(test)]
mod topology_regression_tests {
    use std::collections::HashMap;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    use topogen::config_loader::load_config;
    use topogen::orchestrator::{deploy_configs, generate_topology};
    use topogen::topology::{InterfaceType, TopologyStore};

    /// Two-AS lab: seven RIP routers in AS 10, two OSPF routers in AS 20,
    /// every link declared from both sides.
    const LAB: &str = r#"
autonomous_systems:
  - number: 10
    igp: RIP
    router_id_family: 1
    link_prefix: "2001:192:168"
  - number: 20
    igp: OSPF
    router_id_family: 2
    link_prefix: "2001:192:169"
routers:
  - { id: 1, as_number: 10, links: [[2, 1], [3, 2]], ibgp_peers: [2, 3, 4, 5, 6, 7] }
  - { id: 2, as_number: 10, links: [[1, 1], [3, 3], [4, 4]], ibgp_peers: [1, 3, 4, 5, 6, 7] }
  - { id: 3, as_number: 10, links: [[1, 2], [2, 3], [5, 5]], ibgp_peers: [1, 2, 4, 5, 6, 7] }
  - { id: 4, as_number: 10, links: [[2, 4], [5, 6], [7, 7], [6, 9]], ibgp_peers: [1, 2, 3, 5, 6, 7] }
  - { id: 5, as_number: 10, links: [[3, 5], [4, 6], [6, 8], [7, 10]], ibgp_peers: [1, 2, 3, 4, 6, 7] }
  - id: 6
    as_number: 10
    links: [[4, 9], [5, 8]]
    ibgp_peers: [1, 2, 3, 4, 5, 7]
    ebgp_peers: [{ peer: 8, peer_as: 20 }]
  - id: 7
    as_number: 10
    links: [[4, 7], [5, 10]]
    ibgp_peers: [1, 2, 3, 4, 5, 6]
    ebgp_peers: [{ peer: 9, peer_as: 20 }]
  - id: 8
    as_number: 20
    links: [[9, 1]]
    ibgp_peers: [9]
    ebgp_peers: [{ peer: 6, peer_as: 10 }]
  - id: 9
    as_number: 20
    links: [[8, 1]]
    ibgp_peers: [8]
    ebgp_peers: [{ peer: 7, peer_as: 10 }]
"#;

    fn lab_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", LAB).unwrap();
        file
    }

    #[test]
    fn test_both_ends_of_every_link_agree() {
        let dir = TempDir::new().unwrap();
        let config = load_config(lab_file().path()).unwrap();
        let store = generate_topology(&config, &dir.path().join("routers.json")).unwrap();

        assert_eq!(store.len(), 9);
        for router in store.routers() {
            for iface in &router.interfaces {
                let peer = store.get(&iface.peer).unwrap();
                let back = peer.interface_to(&router.name, iface.kind).unwrap();
                assert_eq!(back.local_ip, iface.peer_ip, "{} <-> {}", router.name, peer.name);
                assert_eq!(back.peer_ip, iface.local_ip, "{} <-> {}", router.name, peer.name);
            }
        }
    }

    #[test]
    fn test_every_link_has_its_own_subnet() {
        let dir = TempDir::new().unwrap();
        let config = load_config(lab_file().path()).unwrap();
        let store = generate_topology(&config, &dir.path().join("routers.json")).unwrap();

        // Each subnet is shared by exactly the two ends of one link
        let mut ends: HashMap<String, usize> = HashMap::new();
        for router in store.routers() {
            for iface in &router.interfaces {
                *ends.entry(iface.subnet().to_string()).or_default() += 1;
            }
        }
        assert!(ends.values().all(|&count| count == 2), "{:?}", ends);

        // 10 internal links in AS 10, 1 in AS 20, 2 eBGP links
        assert_eq!(ends.len(), 13);
        assert!(ends.contains_key("2001:192:168:10::/64"));
        assert!(!ends.contains_key("2001:192:168:11::/64"));
        assert!(ends.contains_key("2001:192:169:1::/64"));
        assert!(ends.contains_key("2001:192:170:2::/64"));
    }

    #[test]
    fn test_link_classification() {
        let dir = TempDir::new().unwrap();
        let config = load_config(lab_file().path()).unwrap();
        let store = generate_topology(&config, &dir.path().join("routers.json")).unwrap();

        let r6 = store.get("R6").unwrap();
        assert_eq!(r6.interface_to("R8", InterfaceType::Ebgp).map(|i| i.kind), Some(InterfaceType::Ebgp));
        assert!(r6.interface_to("R8", InterfaceType::Internal).is_none());
        assert_eq!(r6.ebgp_peers.len(), 1);
        assert_eq!(r6.ebgp_peers[0].peer_as, 20);
        assert_eq!(r6.ibgp_peers.len(), 6);

        let r8 = store.get("R8").unwrap();
        assert_eq!(r8.router_id.to_string(), "2.1.1.8");
        assert_eq!(r8.interfaces.iter().filter(|i| i.is_igp_enabled()).count(), 1);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routers.json");
        let lab = lab_file();

        let config = load_config(lab.path()).unwrap();
        generate_topology(&config, &path).unwrap();
        let first = fs::read_to_string(&path).unwrap();

        // A fresh load and a fresh set of counters, as in a new process
        let config = load_config(lab.path()).unwrap();
        generate_topology(&config, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first);

        let store = TopologyStore::load(&path).unwrap();
        store.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_legacy_store_is_extended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routers.json");
        fs::write(
            &path,
            r#"[
    {
        "name": "R1",
        "as_number": 10,
        "router_id_bgp": "1.1.1.1",
        "loopback": "2001:192:100:255::1/128",
        "ospf_area": 0,
        "gns_path": "/home/user/gns3/project/GNS",
        "interfaces": [
            {"peer": "R2", "local_ip": "2001:192:168:1::1/64", "peer_ip": "2001:192:168:1::2/64"}
        ]
    }
]"#,
        )
        .unwrap();

        let config = load_config(lab_file().path()).unwrap();
        let store = generate_topology(&config, &path).unwrap();

        let r1 = store.get("R1").unwrap();
        assert_eq!(r1.interfaces.len(), 2);
        assert_eq!(r1.interfaces[0].local_ip.to_string(), "2001:192:168:1::1/64");
        assert_eq!(r1.igp.to_string(), "RIP");
        assert_eq!(r1.gns_path.as_deref(), Some(std::path::Path::new("/home/user/gns3/project/GNS")));

        // R2 adopts the legacy subnet instead of allocating a new one
        let r2 = store.get("R2").unwrap();
        assert_eq!(r2.interface_to("R1", InterfaceType::Internal).unwrap().local_ip.to_string(), "2001:192:168:1::2/64");
    }

    #[test]
    fn test_deploy_full_lab() {
        let dir = TempDir::new().unwrap();
        let config = load_config(lab_file().path()).unwrap();
        let store = generate_topology(&config, &dir.path().join("routers.json")).unwrap();

        let report = deploy_configs(&config, &store, Some(dir.path()));
        assert_eq!(report.deployed.len(), 9);
        assert!(report.failed.is_empty());

        let r7 = fs::read_to_string(dir.path().join("R7_startup-config.cfg")).unwrap();
        let r9 = store.get("R9").unwrap();
        let r9_end = r9.interface_to("R7", InterfaceType::Ebgp).unwrap();
        assert!(r7.contains(&format!(" neighbor {} remote-as 20\n", r9_end.local_ip.addr())));
        assert!(r7.contains("ipv6 router rip RIP-ASX\n"));

        let r8 = fs::read_to_string(dir.path().join("R8_startup-config.cfg")).unwrap();
        assert!(r8.contains("ipv6 router ospf 1\n router-id 2.1.1.8\n"));
        assert!(r8.contains(" neighbor 2001:192:100:255::9 remote-as 20\n"));
    }
}
