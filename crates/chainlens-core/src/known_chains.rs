//! Built-in metadata for the public networks Hyperlane supports out of the box.
//!
//! The table is immutable and process-wide. Lookups never touch the filesystem, which keeps
//! hover requests cheap.

/// Native gas token of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeToken {
    /// Token name (e.g. `"Ether"`).
    pub name: &'static str,
    /// Ticker symbol (e.g. `"ETH"`).
    pub symbol: &'static str,
}

/// A block explorer frontend for a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockExplorer {
    /// Explorer name.
    pub name: &'static str,
    /// Explorer base URL.
    pub url: &'static str,
}

/// Static metadata describing a known network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainMetadata {
    /// Numeric chain ID.
    pub chain_id: u64,
    /// Canonical lowercase chain name.
    pub name: &'static str,
    /// Human-friendly name, when it differs from `name`.
    pub display_name: Option<&'static str>,
    /// Native gas token, if known.
    pub native_token: Option<NativeToken>,
    /// Block explorers (may be empty).
    pub block_explorers: &'static [BlockExplorer],
    /// Public HTTP RPC endpoints.
    pub public_rpc_urls: &'static [&'static str],
}

impl ChainMetadata {
    /// Name shown to users: `display_name` if present, else `name`.
    pub fn label(&self) -> &'static str {
        self.display_name.unwrap_or(self.name)
    }
}

const ETH: NativeToken = NativeToken {
    name: "Ether",
    symbol: "ETH",
};

/// Every network in the built-in table, ordered by chain ID.
pub static KNOWN_CHAINS: &[ChainMetadata] = &[
    ChainMetadata {
        chain_id: 1,
        name: "ethereum",
        display_name: Some("Ethereum"),
        native_token: Some(ETH),
        block_explorers: &[BlockExplorer {
            name: "Etherscan",
            url: "https://etherscan.io",
        }],
        public_rpc_urls: &["https://cloudflare-eth.com", "https://rpc.ankr.com/eth"],
    },
    ChainMetadata {
        chain_id: 5,
        name: "goerli",
        display_name: Some("Goerli"),
        native_token: Some(ETH),
        block_explorers: &[BlockExplorer {
            name: "Etherscan",
            url: "https://goerli.etherscan.io",
        }],
        public_rpc_urls: &["https://rpc.ankr.com/eth_goerli"],
    },
    ChainMetadata {
        chain_id: 10,
        name: "optimism",
        display_name: Some("Optimism"),
        native_token: Some(ETH),
        block_explorers: &[BlockExplorer {
            name: "Etherscan",
            url: "https://optimistic.etherscan.io",
        }],
        public_rpc_urls: &["https://mainnet.optimism.io"],
    },
    ChainMetadata {
        chain_id: 56,
        name: "bsc",
        display_name: Some("Binance Smart Chain"),
        native_token: Some(NativeToken {
            name: "BNB",
            symbol: "BNB",
        }),
        block_explorers: &[BlockExplorer {
            name: "BscScan",
            url: "https://bscscan.com",
        }],
        public_rpc_urls: &["https://bsc-dataseed.binance.org", "https://rpc.ankr.com/bsc"],
    },
    ChainMetadata {
        chain_id: 97,
        name: "bsctestnet",
        display_name: Some("Binance Smart Chain Testnet"),
        native_token: Some(NativeToken {
            name: "BNB",
            symbol: "BNB",
        }),
        block_explorers: &[BlockExplorer {
            name: "BscScan",
            url: "https://testnet.bscscan.com",
        }],
        public_rpc_urls: &["https://data-seed-prebsc-1-s3.binance.org:8545"],
    },
    ChainMetadata {
        chain_id: 100,
        name: "gnosis",
        display_name: Some("Gnosis"),
        native_token: Some(NativeToken {
            name: "xDai",
            symbol: "xDai",
        }),
        block_explorers: &[BlockExplorer {
            name: "GnosisScan",
            url: "https://gnosisscan.io",
        }],
        public_rpc_urls: &["https://rpc.gnosischain.com"],
    },
    ChainMetadata {
        chain_id: 137,
        name: "polygon",
        display_name: Some("Polygon"),
        native_token: Some(NativeToken {
            name: "Matic",
            symbol: "MATIC",
        }),
        block_explorers: &[BlockExplorer {
            name: "PolygonScan",
            url: "https://polygonscan.com",
        }],
        public_rpc_urls: &["https://rpc-mainnet.matic.quiknode.pro", "https://polygon-rpc.com"],
    },
    ChainMetadata {
        chain_id: 420,
        name: "optimismgoerli",
        display_name: Some("Optimism Goerli"),
        native_token: Some(ETH),
        block_explorers: &[BlockExplorer {
            name: "Etherscan",
            url: "https://goerli-optimism.etherscan.io",
        }],
        public_rpc_urls: &["https://goerli.optimism.io"],
    },
    ChainMetadata {
        chain_id: 1284,
        name: "moonbeam",
        display_name: Some("Moonbeam"),
        native_token: Some(NativeToken {
            name: "GLMR",
            symbol: "GLMR",
        }),
        block_explorers: &[BlockExplorer {
            name: "MoonScan",
            url: "https://moonscan.io",
        }],
        public_rpc_urls: &["https://rpc.api.moonbeam.network"],
    },
    ChainMetadata {
        chain_id: 1287,
        name: "moonbasealpha",
        display_name: Some("Moonbase Alpha"),
        native_token: Some(NativeToken {
            name: "DEV",
            symbol: "DEV",
        }),
        block_explorers: &[BlockExplorer {
            name: "MoonScan",
            url: "https://moonbase.moonscan.io",
        }],
        public_rpc_urls: &["https://rpc.api.moonbase.moonbeam.network"],
    },
    ChainMetadata {
        chain_id: 13371,
        name: "test1",
        display_name: Some("Test 1"),
        native_token: Some(ETH),
        block_explorers: &[],
        public_rpc_urls: &["http://127.0.0.1:8545"],
    },
    ChainMetadata {
        chain_id: 13372,
        name: "test2",
        display_name: Some("Test 2"),
        native_token: Some(ETH),
        block_explorers: &[],
        public_rpc_urls: &["http://127.0.0.1:8545"],
    },
    ChainMetadata {
        chain_id: 13373,
        name: "test3",
        display_name: Some("Test 3"),
        native_token: Some(ETH),
        block_explorers: &[],
        public_rpc_urls: &["http://127.0.0.1:8545"],
    },
    ChainMetadata {
        chain_id: 42161,
        name: "arbitrum",
        display_name: Some("Arbitrum"),
        native_token: Some(ETH),
        block_explorers: &[BlockExplorer {
            name: "Arbiscan",
            url: "https://arbiscan.io",
        }],
        public_rpc_urls: &["https://arb1.arbitrum.io/rpc"],
    },
    ChainMetadata {
        chain_id: 42220,
        name: "celo",
        display_name: Some("Celo"),
        native_token: Some(NativeToken {
            name: "CELO",
            symbol: "CELO",
        }),
        block_explorers: &[
            BlockExplorer {
                name: "CeloScan",
                url: "https://celoscan.io",
            },
            BlockExplorer {
                name: "Blockscout",
                url: "https://explorer.celo.org",
            },
        ],
        public_rpc_urls: &["https://forno.celo.org"],
    },
    ChainMetadata {
        chain_id: 43113,
        name: "fuji",
        display_name: Some("Fuji"),
        native_token: Some(NativeToken {
            name: "Avalanche",
            symbol: "AVAX",
        }),
        block_explorers: &[BlockExplorer {
            name: "SnowTrace",
            url: "https://testnet.snowtrace.io",
        }],
        public_rpc_urls: &["https://api.avax-test.network/ext/bc/C/rpc"],
    },
    ChainMetadata {
        chain_id: 43114,
        name: "avalanche",
        display_name: Some("Avalanche"),
        native_token: Some(NativeToken {
            name: "Avalanche",
            symbol: "AVAX",
        }),
        block_explorers: &[BlockExplorer {
            name: "SnowTrace",
            url: "https://snowtrace.io",
        }],
        public_rpc_urls: &["https://api.avax.network/ext/bc/C/rpc"],
    },
    ChainMetadata {
        chain_id: 44787,
        name: "alfajores",
        display_name: Some("Alfajores"),
        native_token: Some(NativeToken {
            name: "CELO",
            symbol: "CELO",
        }),
        block_explorers: &[BlockExplorer {
            name: "CeloScan",
            url: "https://alfajores.celoscan.io",
        }],
        public_rpc_urls: &["https://alfajores-forno.celo-testnet.org"],
    },
    ChainMetadata {
        chain_id: 80001,
        name: "mumbai",
        display_name: Some("Mumbai"),
        native_token: Some(NativeToken {
            name: "Matic",
            symbol: "MATIC",
        }),
        block_explorers: &[BlockExplorer {
            name: "PolygonScan",
            url: "https://mumbai.polygonscan.com",
        }],
        public_rpc_urls: &[
            "https://rpc-mumbai.maticvigil.com",
            "https://matic-mumbai.chainstacklabs.com",
        ],
    },
    ChainMetadata {
        chain_id: 421613,
        name: "arbitrumgoerli",
        display_name: Some("Arbitrum Goerli"),
        native_token: Some(ETH),
        block_explorers: &[BlockExplorer {
            name: "Arbiscan",
            url: "https://goerli.arbiscan.io",
        }],
        public_rpc_urls: &["https://goerli-rollup.arbitrum.io/rpc"],
    },
    ChainMetadata {
        chain_id: 11155111,
        name: "sepolia",
        display_name: Some("Sepolia"),
        native_token: Some(ETH),
        block_explorers: &[BlockExplorer {
            name: "Etherscan",
            url: "https://sepolia.etherscan.io",
        }],
        public_rpc_urls: &["https://rpc.sepolia.org"],
    },
];

/// Look up a chain ID (as written in source) in the built-in table.
///
/// Only canonical decimal spellings match: `"1"` is Ethereum, `"01"` is not a known network.
pub fn lookup_known(chain_id: &str) -> Option<&'static ChainMetadata> {
    let id = chain_id.parse::<u64>().ok()?;
    if id.to_string() != chain_id {
        return None;
    }
    KNOWN_CHAINS
        .binary_search_by_key(&id, |chain| chain.chain_id)
        .ok()
        .map(|index| &KNOWN_CHAINS[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        for pair in KNOWN_CHAINS.windows(2) {
            assert!(pair[0].chain_id < pair[1].chain_id, "{:?}", pair[1].name);
        }
    }

    #[test]
    fn lookup_by_canonical_id() {
        let ethereum = lookup_known("1").unwrap();
        assert_eq!(ethereum.name, "ethereum");
        assert_eq!(ethereum.label(), "Ethereum");
        assert!(lookup_known("01").is_none());
        assert!(lookup_known("999999").is_none());
        assert!(lookup_known("31337").is_none());
        assert!(lookup_known("99999999999999999999999").is_none());
    }
}
