// Extended key toolkit for bitcoin & litecoin HD wallets
// by LNP/BP Association (https://lnp-bp.org)
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

use std::str::FromStr;

use slip132::{KeyPrefix, KeyVersion};

use crate::Error;

/// Per-network constants used for extended key, address and WIF encodings
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NetworkParams {
    /// Human-readable part of segwit addresses
    pub bech32_hrp: &'static str,
    /// Version bytes of serialized extended public keys
    pub bip32_public: KeyVersion,
    /// Version bytes of serialized extended private keys
    pub bip32_private: KeyVersion,
    /// Version byte of P2PKH addresses
    pub pubkey_hash: u8,
    /// Version byte of P2SH addresses
    pub script_hash: u8,
    /// Version byte of WIF private keys
    pub wif: u8,
}

impl NetworkParams {
    /// Checks whether extended key version bytes belong to the network
    pub fn accepts(&self, version: KeyVersion) -> bool {
        version == self.bip32_public || version == self.bip32_private
    }
}

/// Bitcoin mainnet parameters
pub const BITCOIN: NetworkParams = NetworkParams {
    bech32_hrp: "bc",
    bip32_public: KeyVersion::from_u32(0x0488b21e),
    bip32_private: KeyVersion::from_u32(0x0488ade4),
    pubkey_hash: 0x00,
    script_hash: 0x05,
    wif: 0x80,
};

/// Bitcoin testnet parameters
pub const BITCOIN_TESTNET: NetworkParams = NetworkParams {
    bech32_hrp: "tb",
    bip32_public: KeyVersion::from_u32(0x043587cf),
    bip32_private: KeyVersion::from_u32(0x04358394),
    pubkey_hash: 0x6f,
    script_hash: 0xc4,
    wif: 0xef,
};

/// Litecoin mainnet parameters. Extended keys use bitcoin mainnet versions.
pub const LITECOIN: NetworkParams = NetworkParams {
    bech32_hrp: "ltc",
    bip32_public: KeyVersion::from_u32(0x0488b21e),
    bip32_private: KeyVersion::from_u32(0x0488ade4),
    pubkey_hash: 0x30,
    script_hash: 0x32,
    wif: 0xb0,
};

/// Litecoin testnet parameters. Extended keys use bitcoin testnet versions.
pub const LITECOIN_TESTNET: NetworkParams = NetworkParams {
    bech32_hrp: "tltc",
    bip32_public: KeyVersion::from_u32(0x043587cf),
    bip32_private: KeyVersion::from_u32(0x04358394),
    pubkey_hash: 0x6f,
    script_hash: 0x3a,
    wif: 0xef,
};

/// Supported coin & chain combinations
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "lowercase")
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum Network {
    /// Bitcoin mainnet
    #[display("btc")]
    Btc,

    /// Bitcoin testnet
    #[display("btctest")]
    BtcTest,

    /// Litecoin mainnet
    #[display("ltc")]
    Ltc,

    /// Litecoin testnet
    #[display("ltctest")]
    LtcTest,
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "btc" => Network::Btc,
            "btctest" => Network::BtcTest,
            "ltc" => Network::Ltc,
            "ltctest" => Network::LtcTest,
            _ => return Err(Error::InvalidNetwork(s.to_owned())),
        })
    }
}

impl Network {
    /// All supported networks
    pub const ALL: [Network; 4] = [Network::Btc, Network::BtcTest, Network::Ltc, Network::LtcTest];

    /// Static parameter table entry
    pub fn params(self) -> &'static NetworkParams {
        match self {
            Network::Btc => &BITCOIN,
            Network::BtcTest => &BITCOIN_TESTNET,
            Network::Ltc => &LITECOIN,
            Network::LtcTest => &LITECOIN_TESTNET,
        }
    }

    /// Whether the network is a test chain
    pub fn is_testnet(self) -> bool { matches!(self, Network::BtcTest | Network::LtcTest) }

    /// Parses either the four-value selector or the legacy `mainnet` /
    /// `testnet` form
    pub fn from_any_str(s: &str) -> Result<Network, Error> {
        s.parse::<Network>()
            .or_else(|_| s.parse::<LegacyNetwork>().map(Network::from))
    }

    /// Bitcoin network an extended key prefix was registered for
    pub fn with_prefix(prefix: KeyPrefix) -> Network {
        if prefix.is_mainnet() {
            Network::Btc
        } else {
            Network::BtcTest
        }
    }
}

/// Two-value network selector used by entry points which predate litecoin
/// support
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum LegacyNetwork {
    /// Bitcoin mainnet
    #[display("mainnet")]
    Mainnet,

    /// Bitcoin testnet
    #[display("testnet")]
    Testnet,
}

impl FromStr for LegacyNetwork {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "mainnet" => LegacyNetwork::Mainnet,
            "testnet" => LegacyNetwork::Testnet,
            _ => return Err(Error::InvalidNetwork(s.to_owned())),
        })
    }
}

impl From<LegacyNetwork> for Network {
    fn from(network: LegacyNetwork) -> Self {
        match network {
            LegacyNetwork::Mainnet => Network::Btc,
            LegacyNetwork::Testnet => Network::BtcTest,
        }
    }
}
