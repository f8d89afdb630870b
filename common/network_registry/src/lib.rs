//! The chain networks known to the dashboard, and lookups over them.
//!
//! Lookups never fail. An unknown id or name resolves to the default network (the first entry of
//! `CHAIN_NETWORKS`); callers that need to know whether the lookup hit can compare the returned id
//! with the one they asked for.

pub use types::{ChainId, ChainNetwork};

macro_rules! define_net {
    (
        $const_name: ident,
        id: $id: expr,
        name: $name: expr,
        legacy_key: $legacy_key: expr,
        genesis: $genesis: expr,
        seconds_per_slot: $seconds_per_slot: expr,
        slots_per_epoch: $slots_per_epoch: expr,
        epochs_per_sync_period: $epochs_per_sync_period: expr,
        mainnet: $mainnet: expr,
        currencies: ($el_currency: expr, $cl_currency: expr)
    ) => {
        pub const $const_name: ChainNetwork = ChainNetwork {
            id: $id,
            name: $name,
            legacy_key: $legacy_key,
            genesis_timestamp_seconds: $genesis,
            slot_duration_seconds: $seconds_per_slot,
            slots_per_epoch: $slots_per_epoch,
            epochs_per_sync_period: $epochs_per_sync_period,
            is_mainnet: $mainnet,
            el_currency: $el_currency,
            cl_currency: $cl_currency,
        };
    };
}

define_net!(
    ETHEREUM,
    id: 1,
    name: "ethereum",
    legacy_key: "main",
    genesis: 1606824023,
    seconds_per_slot: 12,
    slots_per_epoch: 32,
    epochs_per_sync_period: 256,
    mainnet: true,
    currencies: ("ETH", "ETH")
);

define_net!(
    HOLESKY,
    id: 17000,
    name: "holesky",
    legacy_key: "holesky",
    genesis: 1695902400,
    seconds_per_slot: 12,
    slots_per_epoch: 32,
    epochs_per_sync_period: 256,
    mainnet: false,
    currencies: ("ETH", "ETH")
);

define_net!(
    SEPOLIA,
    id: 11155111,
    name: "sepolia",
    legacy_key: "sepolia",
    genesis: 1655733600,
    seconds_per_slot: 12,
    slots_per_epoch: 32,
    epochs_per_sync_period: 256,
    mainnet: false,
    currencies: ("ETH", "ETH")
);

define_net!(
    HOODI,
    id: 560048,
    name: "hoodi",
    legacy_key: "hoodi",
    genesis: 1742213400,
    seconds_per_slot: 12,
    slots_per_epoch: 32,
    epochs_per_sync_period: 256,
    mainnet: false,
    currencies: ("ETH", "ETH")
);

define_net!(
    GNOSIS,
    id: 100,
    name: "gnosis",
    legacy_key: "gnosis",
    genesis: 1638993340,
    seconds_per_slot: 5,
    slots_per_epoch: 16,
    epochs_per_sync_period: 512,
    mainnet: true,
    currencies: ("xDAI", "GNO")
);

define_net!(
    CHIADO,
    id: 10200,
    name: "chiado",
    legacy_key: "chiado",
    genesis: 1665396300,
    seconds_per_slot: 5,
    slots_per_epoch: 16,
    epochs_per_sync_period: 512,
    mainnet: false,
    currencies: ("xDAI", "GNO")
);

/// Every known network. The first entry is the default returned by failed lookups.
pub const CHAIN_NETWORKS: &[ChainNetwork] = &[ETHEREUM, HOLESKY, SEPOLIA, HOODI, GNOSIS, CHIADO];

pub const DEFAULT_CHAIN_NETWORK: &ChainNetwork = &ETHEREUM;

/// The names of all known networks, in table order.
pub const NETWORK_NAMES: &[&str] = &[
    ETHEREUM.name,
    HOLESKY.name,
    SEPOLIA.name,
    HOODI.name,
    GNOSIS.name,
    CHIADO.name,
];

/// Returns the network with chain id `id`, or the default network.
pub fn find_chain_network_by_id(id: ChainId) -> &'static ChainNetwork {
    find(|network| network.id == id)
}

/// Returns the network called `name` (ignoring ASCII case), or the default network.
pub fn find_chain_network_by_name(name: &str) -> &'static ChainNetwork {
    find(|network| network.name.eq_ignore_ascii_case(name))
}

/// Returns the network stored under the pre-chain-id key `key`, or the default network.
pub fn find_chain_network_by_legacy_key(key: &str) -> &'static ChainNetwork {
    find(|network| network.legacy_key == key)
}

fn find<F>(predicate: F) -> &'static ChainNetwork
where
    F: Fn(&ChainNetwork) -> bool,
{
    CHAIN_NETWORKS
        .iter()
        .find(|network| predicate(*network))
        .unwrap_or(DEFAULT_CHAIN_NETWORK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_entry() {
        assert_eq!(DEFAULT_CHAIN_NETWORK, &CHAIN_NETWORKS[0]);
        assert_eq!(DEFAULT_CHAIN_NETWORK.id, 1);
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(find_chain_network_by_id(100), &GNOSIS);
        assert_eq!(find_chain_network_by_id(17000), &HOLESKY);
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        let network = find_chain_network_by_id(99999);
        assert_eq!(network, DEFAULT_CHAIN_NETWORK);
        assert_ne!(network.id, 99999);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(find_chain_network_by_name("gnosis"), &GNOSIS);
        assert_eq!(find_chain_network_by_name("Sepolia"), &SEPOLIA);
        assert_eq!(find_chain_network_by_name("prater"), DEFAULT_CHAIN_NETWORK);
        assert_eq!(find_chain_network_by_name(""), DEFAULT_CHAIN_NETWORK);
    }

    #[test]
    fn lookup_by_legacy_key() {
        assert_eq!(find_chain_network_by_legacy_key("main"), &ETHEREUM);
        assert_eq!(find_chain_network_by_legacy_key("chiado"), &CHIADO);
        assert_eq!(find_chain_network_by_legacy_key("zhejiang"), DEFAULT_CHAIN_NETWORK);
    }

    #[test]
    fn table_is_consistent() {
        assert_eq!(NETWORK_NAMES.len(), CHAIN_NETWORKS.len());
        for (network, name) in CHAIN_NETWORKS.iter().zip(NETWORK_NAMES) {
            assert_eq!(network.name, *name);
            assert!(network.slot_duration_seconds > 0);
            assert!(network.slots_per_epoch > 0);
            assert!(network.epochs_per_sync_period > 0);
            assert_eq!(find_chain_network_by_id(network.id), network);
        }
    }
}
