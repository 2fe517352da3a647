// SLIP-132 library for parsing and converting custom xpub/xpriv key formats
// Written in 2021-2022 by
//     Dr. Maxim Orlovsky <orlovsky@pandoracore.com>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the Apache 2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

//! SLIP-132 extended key prefixes: version table, payload decoding and
//! version-bytes conversion between `xpub`, `ypub`, `Zprv`, `tpub` and the
//! rest of the family.

// Coding conventions
#![recursion_limit = "256"]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bitcoin::util::base58;
use bitcoin::util::bip32::{self, ExtendedPrivKey, ExtendedPubKey};
use bitcoin::Network;

/// Magical version bytes for xpub: bitcoin mainnet public key for P2PKH or P2SH
pub const VERSION_MAGIC_XPUB: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
/// Magical version bytes for xprv: bitcoin mainnet private key for P2PKH or
/// P2SH
pub const VERSION_MAGIC_XPRV: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
/// Magical version bytes for ypub: bitcoin mainnet public key for P2WPKH in
/// P2SH
pub const VERSION_MAGIC_YPUB: [u8; 4] = [0x04, 0x9D, 0x7C, 0xB2];
/// Magical version bytes for yprv: bitcoin mainnet private key for P2WPKH in
/// P2SH
pub const VERSION_MAGIC_YPRV: [u8; 4] = [0x04, 0x9D, 0x78, 0x78];
/// Magical version bytes for zpub: bitcoin mainnet public key for P2WPKH
pub const VERSION_MAGIC_ZPUB: [u8; 4] = [0x04, 0xB2, 0x47, 0x46];
/// Magical version bytes for zprv: bitcoin mainnet private key for P2WPKH
pub const VERSION_MAGIC_ZPRV: [u8; 4] = [0x04, 0xB2, 0x43, 0x0C];
/// Magical version bytes for Ypub: bitcoin mainnet public key for
/// multi-signature P2WSH in P2SH
pub const VERSION_MAGIC_YPUB_MULTISIG: [u8; 4] = [0x02, 0x95, 0xb4, 0x3f];
/// Magical version bytes for Yprv: bitcoin mainnet private key for
/// multi-signature P2WSH in P2SH
pub const VERSION_MAGIC_YPRV_MULTISIG: [u8; 4] = [0x02, 0x95, 0xb0, 0x05];
/// Magical version bytes for Zpub: bitcoin mainnet public key for
/// multi-signature P2WSH
pub const VERSION_MAGIC_ZPUB_MULTISIG: [u8; 4] = [0x02, 0xaa, 0x7e, 0xd3];
/// Magical version bytes for Zprv: bitcoin mainnet private key for
/// multi-signature P2WSH
pub const VERSION_MAGIC_ZPRV_MULTISIG: [u8; 4] = [0x02, 0xaa, 0x7a, 0x99];

/// Magical version bytes for tpub: bitcoin testnet/regtest public key for
/// P2PKH or P2SH
pub const VERSION_MAGIC_TPUB: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];
/// Magical version bytes for tprv: bitcoin testnet/regtest private key for
/// P2PKH or P2SH
pub const VERSION_MAGIC_TPRV: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
/// Magical version bytes for upub: bitcoin testnet/regtest public key for
/// P2WPKH in P2SH
pub const VERSION_MAGIC_UPUB: [u8; 4] = [0x04, 0x4A, 0x52, 0x62];
/// Magical version bytes for uprv: bitcoin testnet/regtest private key for
/// P2WPKH in P2SH
pub const VERSION_MAGIC_UPRV: [u8; 4] = [0x04, 0x4A, 0x4E, 0x28];
/// Magical version bytes for vpub: bitcoin testnet/regtest public key for
/// P2WPKH
pub const VERSION_MAGIC_VPUB: [u8; 4] = [0x04, 0x5F, 0x1C, 0xF6];
/// Magical version bytes for vprv: bitcoin testnet/regtest private key for
/// P2WPKH
pub const VERSION_MAGIC_VPRV: [u8; 4] = [0x04, 0x5F, 0x18, 0xBC];
/// Magical version bytes for Upub: bitcoin testnet/regtest public key for
/// multi-signature P2WSH in P2SH
pub const VERSION_MAGIC_UPUB_MULTISIG: [u8; 4] = [0x02, 0x42, 0x89, 0xef];
/// Magical version bytes for Uprv: bitcoin testnet/regtest private key for
/// multi-signature P2WSH in P2SH
pub const VERSION_MAGIC_UPRV_MULTISIG: [u8; 4] = [0x02, 0x42, 0x85, 0xb5];
/// Magical version bytes for Vpub: bitcoin testnet/regtest public key for
/// multi-signature P2WSH
pub const VERSION_MAGIC_VPUB_MULTISIG: [u8; 4] = [0x02, 0x57, 0x54, 0x83];
/// Magical version bytes for Vprv: bitcoin testnet/regtest private key for
/// multi-signature P2WSH
pub const VERSION_MAGIC_VPRV_MULTISIG: [u8; 4] = [0x02, 0x57, 0x50, 0x48];

/// Length of the BIP32 extended key payload once the Base58Check checksum is
/// removed
pub const EXTENDED_KEY_LEN: usize = 78;

/// Extended public and private key processing errors
#[derive(Clone, PartialEq, Eq, Debug, Display, From, Error)]
#[display(doc_comments)]
pub enum Error {
    /// invalid extended key encoding: {0}
    #[from]
    InvalidExtendedKey(base58::Error),

    /// encoded extended key data has wrong length {0} (78 bytes expected)
    WrongExtendedKeyLength(usize),

    /// unrecognized extended key prefix `{0}`; known prefixes are xprv, xpub,
    /// yprv, ypub, Yprv, Ypub, zprv, zpub, Zprv, Zpub, tprv, tpub, uprv,
    /// upub, Uprv, Upub, vprv, vpub, Vprv and Vpub
    UnknownPrefix(String),

    /// unknown extended key version magic bytes {0}
    UnknownVersion(KeyVersion),

    /// conversion of `{0}` key into `{1}` is meaningless since the prefixes
    /// belong to different network or key kind groups
    MismatchedConversionGroup(KeyPrefix, KeyPrefix),

    /// `{0}` extended key holds a different key kind than the one requested
    UnexpectedKeyKind(KeyPrefix),

    /// BIP32 failure: {0}
    #[from]
    Bip32(bip32::Error),
}

/// Structure holding 4 version bytes with magical numbers representing
/// different versions of extended public and private keys according to
/// BIP-32.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct KeyVersion([u8; 4]);

impl Display for KeyVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "{:08x}", self.to_u32()) }
}

impl KeyVersion {
    /// Tries to construct [`KeyVersion`] object from a byte slice. If byte
    /// slice length is not equal to 4, returns `None`
    pub fn from_slice(version_slice: &[u8]) -> Option<KeyVersion> {
        if version_slice.len() != 4 {
            return None;
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(version_slice);
        Some(KeyVersion::from_bytes(bytes))
    }

    /// Constructs [`KeyVersion`] from a fixed 4 bytes values
    pub const fn from_bytes(version_bytes: [u8; 4]) -> KeyVersion { KeyVersion(version_bytes) }

    /// Constructs [`KeyVersion`] from a `u32`-representation of the version
    /// bytes (the representation must be in bing endian format)
    pub const fn from_u32(version: u32) -> KeyVersion { KeyVersion(version.to_be_bytes()) }

    /// Converts version bytes into `u32` representation in big endian format
    pub const fn to_u32(&self) -> u32 { u32::from_be_bytes(self.0) }

    /// Returns slice representing internal version bytes
    pub fn as_slice(&self) -> &[u8] { &self.0 }

    /// Returns internal representation of version bytes
    pub fn as_bytes(&self) -> &[u8; 4] { &self.0 }

    /// Constructs 4-byte array containing version byte values
    pub fn to_bytes(&self) -> [u8; 4] { self.0 }
}

/// SLIP 132-defined key applications defining types of scriptPubkey descriptors
/// in which they can be used
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum KeyApplication {
    /// xprv/xpub: keys that can be used for P2PKH and multisig P2SH
    /// scriptPubkey descriptors.
    #[display("BIP44")]
    #[cfg_attr(feature = "serde", serde(rename = "bip44"))]
    Hashed,

    /// zprv/zpub: keys that can be used for P2WPKH scriptPubkey descriptors
    #[display("BIP84")]
    #[cfg_attr(feature = "serde", serde(rename = "bip84"))]
    SegWit,

    /// Zprv/Zpub: keys that can be used for multisig P2WSH scriptPubkey
    /// descriptors
    #[display("BIP48-native")]
    #[cfg_attr(feature = "serde", serde(rename = "bip48-native"))]
    SegWitMultisig,

    /// yprv/ypub: keys that can be used for P2WPKH-in-P2SH scriptPubkey
    /// descriptors
    #[display("BIP49")]
    #[cfg_attr(feature = "serde", serde(rename = "bip49"))]
    Nested,

    /// Yprv/Ypub: keys that can be used for multisig P2WSH-in-P2SH
    /// scriptPubkey descriptors
    #[display("BIP48-nested")]
    #[cfg_attr(feature = "serde", serde(rename = "bip48-nested"))]
    NestedMultisig,
}

/// Unknown string representation of [`KeyApplication`] enum
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub struct UnknownKeyApplicationError;

impl FromStr for KeyApplication {
    type Err = UnknownKeyApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "bip44" => KeyApplication::Hashed,
            "bip84" => KeyApplication::SegWit,
            "bip48-native" => KeyApplication::SegWitMultisig,
            "bip49" => KeyApplication::Nested,
            "bip48-nested" => KeyApplication::NestedMultisig,
            _ => return Err(UnknownKeyApplicationError),
        })
    }
}

/// One of the four disjoint groups extended key prefixes fall into. Version
/// conversion is meaningful only between members of the same group.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum KeyGroup {
    /// Mainnet private keys: xprv, yprv, Yprv, zprv, Zprv
    #[display("mainnet private")]
    MainnetPrivate,

    /// Mainnet public keys: xpub, ypub, Ypub, zpub, Zpub
    #[display("mainnet public")]
    MainnetPublic,

    /// Testnet private keys: tprv, uprv, Uprv, vprv, Vprv
    #[display("testnet private")]
    TestnetPrivate,

    /// Testnet public keys: tpub, upub, Upub, vpub, Vpub
    #[display("testnet public")]
    TestnetPublic,
}

impl KeyGroup {
    /// Prefixes belonging to the group
    pub fn members(self) -> &'static [KeyPrefix] {
        match self {
            KeyGroup::MainnetPrivate => &[
                KeyPrefix::Xprv,
                KeyPrefix::Yprv,
                KeyPrefix::YprvMultisig,
                KeyPrefix::Zprv,
                KeyPrefix::ZprvMultisig,
            ],
            KeyGroup::MainnetPublic => &[
                KeyPrefix::Xpub,
                KeyPrefix::Ypub,
                KeyPrefix::YpubMultisig,
                KeyPrefix::Zpub,
                KeyPrefix::ZpubMultisig,
            ],
            KeyGroup::TestnetPrivate => &[
                KeyPrefix::Tprv,
                KeyPrefix::Uprv,
                KeyPrefix::UprvMultisig,
                KeyPrefix::Vprv,
                KeyPrefix::VprvMultisig,
            ],
            KeyGroup::TestnetPublic => &[
                KeyPrefix::Tpub,
                KeyPrefix::Upub,
                KeyPrefix::UpubMultisig,
                KeyPrefix::Vpub,
                KeyPrefix::VpubMultisig,
            ],
        }
    }

    /// Whether the group holds private keys
    pub fn is_private(self) -> bool {
        matches!(self, KeyGroup::MainnetPrivate | KeyGroup::TestnetPrivate)
    }

    /// Whether the group holds mainnet keys
    pub fn is_mainnet(self) -> bool {
        matches!(self, KeyGroup::MainnetPrivate | KeyGroup::MainnetPublic)
    }
}

/// Four-character prefix of a Base58Check-encoded extended key, uniquely
/// identifying its version bytes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum KeyPrefix {
    /// Mainnet private key for P2PKH or P2SH
    #[display("xprv")]
    Xprv,
    /// Mainnet public key for P2PKH or P2SH
    #[display("xpub")]
    Xpub,
    /// Mainnet private key for P2WPKH in P2SH
    #[display("yprv")]
    Yprv,
    /// Mainnet public key for P2WPKH in P2SH
    #[display("ypub")]
    Ypub,
    /// Mainnet private key for multi-signature P2WSH in P2SH
    #[display("Yprv")]
    YprvMultisig,
    /// Mainnet public key for multi-signature P2WSH in P2SH
    #[display("Ypub")]
    YpubMultisig,
    /// Mainnet private key for P2WPKH
    #[display("zprv")]
    Zprv,
    /// Mainnet public key for P2WPKH
    #[display("zpub")]
    Zpub,
    /// Mainnet private key for multi-signature P2WSH
    #[display("Zprv")]
    ZprvMultisig,
    /// Mainnet public key for multi-signature P2WSH
    #[display("Zpub")]
    ZpubMultisig,
    /// Testnet private key for P2PKH or P2SH
    #[display("tprv")]
    Tprv,
    /// Testnet public key for P2PKH or P2SH
    #[display("tpub")]
    Tpub,
    /// Testnet private key for P2WPKH in P2SH
    #[display("uprv")]
    Uprv,
    /// Testnet public key for P2WPKH in P2SH
    #[display("upub")]
    Upub,
    /// Testnet private key for multi-signature P2WSH in P2SH
    #[display("Uprv")]
    UprvMultisig,
    /// Testnet public key for multi-signature P2WSH in P2SH
    #[display("Upub")]
    UpubMultisig,
    /// Testnet private key for P2WPKH
    #[display("vprv")]
    Vprv,
    /// Testnet public key for P2WPKH
    #[display("vpub")]
    Vpub,
    /// Testnet private key for multi-signature P2WSH
    #[display("Vprv")]
    VprvMultisig,
    /// Testnet public key for multi-signature P2WSH
    #[display("Vpub")]
    VpubMultisig,
}

impl FromStr for KeyPrefix {
    type Err = Error;

    /// Prefixes are case-sensitive: `ypub` and `Ypub` are different keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPrefix::ALL
            .into_iter()
            .find(|prefix| prefix.to_string() == s)
            .ok_or_else(|| Error::UnknownPrefix(s.to_owned()))
    }
}

impl KeyPrefix {
    /// All recognized prefixes, mainnet first
    pub const ALL: [KeyPrefix; 20] = [
        KeyPrefix::Xprv,
        KeyPrefix::Xpub,
        KeyPrefix::Yprv,
        KeyPrefix::Ypub,
        KeyPrefix::YprvMultisig,
        KeyPrefix::YpubMultisig,
        KeyPrefix::Zprv,
        KeyPrefix::Zpub,
        KeyPrefix::ZprvMultisig,
        KeyPrefix::ZpubMultisig,
        KeyPrefix::Tprv,
        KeyPrefix::Tpub,
        KeyPrefix::Uprv,
        KeyPrefix::Upub,
        KeyPrefix::UprvMultisig,
        KeyPrefix::UpubMultisig,
        KeyPrefix::Vprv,
        KeyPrefix::Vpub,
        KeyPrefix::VprvMultisig,
        KeyPrefix::VpubMultisig,
    ];

    /// Reads the prefix from the first four characters of a Base58 extended
    /// key string. The key itself is not decoded.
    pub fn from_xkey_str(xkey: &str) -> Result<KeyPrefix, Error> {
        let xkey = xkey.trim();
        match xkey.get(..4) {
            Some(prefix) => prefix.parse(),
            None => Err(Error::UnknownPrefix(xkey.to_owned())),
        }
    }

    /// Finds the prefix matching given version bytes
    pub fn from_version(version: KeyVersion) -> Option<KeyPrefix> {
        KeyPrefix::ALL.into_iter().find(|prefix| prefix.version() == version)
    }

    /// Version bytes written at the start of the extended key payload
    pub fn version(self) -> KeyVersion {
        KeyVersion::from_bytes(match self {
            KeyPrefix::Xprv => VERSION_MAGIC_XPRV,
            KeyPrefix::Xpub => VERSION_MAGIC_XPUB,
            KeyPrefix::Yprv => VERSION_MAGIC_YPRV,
            KeyPrefix::Ypub => VERSION_MAGIC_YPUB,
            KeyPrefix::YprvMultisig => VERSION_MAGIC_YPRV_MULTISIG,
            KeyPrefix::YpubMultisig => VERSION_MAGIC_YPUB_MULTISIG,
            KeyPrefix::Zprv => VERSION_MAGIC_ZPRV,
            KeyPrefix::Zpub => VERSION_MAGIC_ZPUB,
            KeyPrefix::ZprvMultisig => VERSION_MAGIC_ZPRV_MULTISIG,
            KeyPrefix::ZpubMultisig => VERSION_MAGIC_ZPUB_MULTISIG,
            KeyPrefix::Tprv => VERSION_MAGIC_TPRV,
            KeyPrefix::Tpub => VERSION_MAGIC_TPUB,
            KeyPrefix::Uprv => VERSION_MAGIC_UPRV,
            KeyPrefix::Upub => VERSION_MAGIC_UPUB,
            KeyPrefix::UprvMultisig => VERSION_MAGIC_UPRV_MULTISIG,
            KeyPrefix::UpubMultisig => VERSION_MAGIC_UPUB_MULTISIG,
            KeyPrefix::Vprv => VERSION_MAGIC_VPRV,
            KeyPrefix::Vpub => VERSION_MAGIC_VPUB,
            KeyPrefix::VprvMultisig => VERSION_MAGIC_VPRV_MULTISIG,
            KeyPrefix::VpubMultisig => VERSION_MAGIC_VPUB_MULTISIG,
        })
    }

    /// Group of prefixes this one can be meaningfully converted into
    pub fn group(self) -> KeyGroup {
        match (self.is_mainnet(), self.is_private()) {
            (true, true) => KeyGroup::MainnetPrivate,
            (true, false) => KeyGroup::MainnetPublic,
            (false, true) => KeyGroup::TestnetPrivate,
            (false, false) => KeyGroup::TestnetPublic,
        }
    }

    /// Prefixes this one can be meaningfully converted into (including
    /// itself)
    #[inline]
    pub fn valid_targets(self) -> &'static [KeyPrefix] { self.group().members() }

    /// Detects whether the prefix denotes a private key
    pub fn is_private(self) -> bool {
        matches!(
            self,
            KeyPrefix::Xprv
                | KeyPrefix::Yprv
                | KeyPrefix::YprvMultisig
                | KeyPrefix::Zprv
                | KeyPrefix::ZprvMultisig
                | KeyPrefix::Tprv
                | KeyPrefix::Uprv
                | KeyPrefix::UprvMultisig
                | KeyPrefix::Vprv
                | KeyPrefix::VprvMultisig
        )
    }

    /// Detects whether the prefix belongs to the bitcoin mainnet
    pub fn is_mainnet(self) -> bool {
        (self as u8) < (KeyPrefix::Tprv as u8)
    }

    /// Bitcoin network the version bytes are registered for
    pub fn network(self) -> Network {
        if self.is_mainnet() {
            Network::Bitcoin
        } else {
            Network::Testnet
        }
    }

    /// Script application the prefix was registered for
    pub fn application(self) -> KeyApplication {
        match self {
            KeyPrefix::Xprv | KeyPrefix::Xpub | KeyPrefix::Tprv | KeyPrefix::Tpub => {
                KeyApplication::Hashed
            }
            KeyPrefix::Yprv | KeyPrefix::Ypub | KeyPrefix::Uprv | KeyPrefix::Upub => {
                KeyApplication::Nested
            }
            KeyPrefix::YprvMultisig
            | KeyPrefix::YpubMultisig
            | KeyPrefix::UprvMultisig
            | KeyPrefix::UpubMultisig => KeyApplication::NestedMultisig,
            KeyPrefix::Zprv | KeyPrefix::Zpub | KeyPrefix::Vprv | KeyPrefix::Vpub => {
                KeyApplication::SegWit
            }
            KeyPrefix::ZprvMultisig
            | KeyPrefix::ZpubMultisig
            | KeyPrefix::VprvMultisig
            | KeyPrefix::VpubMultisig => KeyApplication::SegWitMultisig,
        }
    }

    /// Plain BIP32 prefix (`xprv`, `xpub`, `tprv` or `tpub`) with the same
    /// network and key kind, understood by any BIP32 implementation
    pub fn normalized(self) -> KeyPrefix {
        KeyPrefix::resolve(self.network(), KeyApplication::Hashed, self.is_private())
    }

    /// Prefix for the given network, script application and key kind. All
    /// networks except bitcoin mainnet resolve to testnet prefixes.
    pub fn resolve(network: Network, applicable_for: KeyApplication, is_priv: bool) -> KeyPrefix {
        match (network, applicable_for, is_priv) {
            (Network::Bitcoin, KeyApplication::Hashed, false) => KeyPrefix::Xpub,
            (Network::Bitcoin, KeyApplication::Hashed, true) => KeyPrefix::Xprv,
            (Network::Bitcoin, KeyApplication::Nested, false) => KeyPrefix::Ypub,
            (Network::Bitcoin, KeyApplication::Nested, true) => KeyPrefix::Yprv,
            (Network::Bitcoin, KeyApplication::SegWit, false) => KeyPrefix::Zpub,
            (Network::Bitcoin, KeyApplication::SegWit, true) => KeyPrefix::Zprv,
            (Network::Bitcoin, KeyApplication::NestedMultisig, false) => KeyPrefix::YpubMultisig,
            (Network::Bitcoin, KeyApplication::NestedMultisig, true) => KeyPrefix::YprvMultisig,
            (Network::Bitcoin, KeyApplication::SegWitMultisig, false) => KeyPrefix::ZpubMultisig,
            (Network::Bitcoin, KeyApplication::SegWitMultisig, true) => KeyPrefix::ZprvMultisig,
            (_, KeyApplication::Hashed, false) => KeyPrefix::Tpub,
            (_, KeyApplication::Hashed, true) => KeyPrefix::Tprv,
            (_, KeyApplication::Nested, false) => KeyPrefix::Upub,
            (_, KeyApplication::Nested, true) => KeyPrefix::Uprv,
            (_, KeyApplication::SegWit, false) => KeyPrefix::Vpub,
            (_, KeyApplication::SegWit, true) => KeyPrefix::Vprv,
            (_, KeyApplication::NestedMultisig, false) => KeyPrefix::UpubMultisig,
            (_, KeyApplication::NestedMultisig, true) => KeyPrefix::UprvMultisig,
            (_, KeyApplication::SegWitMultisig, false) => KeyPrefix::VpubMultisig,
            (_, KeyApplication::SegWitMultisig, true) => KeyPrefix::VprvMultisig,
        }
    }

    /// Public counterpart of a private prefix; public prefixes are returned
    /// as is
    pub fn to_public(self) -> KeyPrefix {
        KeyPrefix::resolve(self.network(), self.application(), false)
    }

    /// Private counterpart of a public prefix; private prefixes are returned
    /// as is
    pub fn to_private(self) -> KeyPrefix {
        KeyPrefix::resolve(self.network(), self.application(), true)
    }
}

/// Decoded 78-byte payload of an extended key.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ExtendedKeyData {
    /// Version magic bytes
    pub version: KeyVersion,
    /// Depth in the derivation tree, 0 for master keys
    pub depth: u8,
    /// First four bytes of the parent key hash160
    pub parent_fingerprint: [u8; 4],
    /// Index of the key within its parent, hardened indexes included
    pub child_number: u32,
    /// Chain code
    pub chain_code: [u8; 32],
    /// Either `0x00` followed by the private key or a compressed public key
    pub key_data: [u8; 33],
}

impl ExtendedKeyData {
    /// Decodes Base58Check string, verifying its checksum and length
    pub fn decode(xkey: &str) -> Result<ExtendedKeyData, Error> {
        let data = base58::from_check(xkey.trim())?;
        ExtendedKeyData::from_slice(&data)
    }

    /// Parses raw payload without checksum
    pub fn from_slice(data: &[u8]) -> Result<ExtendedKeyData, Error> {
        if data.len() != EXTENDED_KEY_LEN {
            return Err(Error::WrongExtendedKeyLength(data.len()));
        }
        let mut version = [0u8; 4];
        let mut parent_fingerprint = [0u8; 4];
        let mut child_number = [0u8; 4];
        let mut chain_code = [0u8; 32];
        let mut key_data = [0u8; 33];
        version.copy_from_slice(&data[0..4]);
        parent_fingerprint.copy_from_slice(&data[5..9]);
        child_number.copy_from_slice(&data[9..13]);
        chain_code.copy_from_slice(&data[13..45]);
        key_data.copy_from_slice(&data[45..78]);
        Ok(ExtendedKeyData {
            version: KeyVersion::from_bytes(version),
            depth: data[4],
            parent_fingerprint,
            child_number: u32::from_be_bytes(child_number),
            chain_code,
            key_data,
        })
    }

    /// Serializes payload back into 78 bytes
    pub fn encode(&self) -> [u8; EXTENDED_KEY_LEN] {
        let mut data = [0u8; EXTENDED_KEY_LEN];
        data[0..4].copy_from_slice(self.version.as_slice());
        data[4] = self.depth;
        data[5..9].copy_from_slice(&self.parent_fingerprint);
        data[9..13].copy_from_slice(&self.child_number.to_be_bytes());
        data[13..45].copy_from_slice(&self.chain_code);
        data[45..78].copy_from_slice(&self.key_data);
        data
    }

    /// Encodes payload as Base58Check string
    pub fn to_base58(&self) -> String { base58::check_encode_slice(&self.encode()) }

    /// Returns a copy of the payload carrying other version bytes
    pub fn with_version(mut self, version: KeyVersion) -> ExtendedKeyData {
        self.version = version;
        self
    }

    /// Prefix matching the payload version, if known
    pub fn prefix(&self) -> Option<KeyPrefix> { KeyPrefix::from_version(self.version) }

    /// Detects private key marker in the key data
    pub fn has_private_key(&self) -> bool { self.key_data[0] == 0 }
}

/// Rewrites version bytes of an extended key with the ones of `target`,
/// leaving the rest of the payload untouched.
///
/// No check is made that the conversion is meaningful: a public key may be
/// turned into a private one at the byte level. Use [`convert_checked`] where
/// the source and target must belong to the same [`KeyGroup`].
pub fn convert(xkey: &str, target: KeyPrefix) -> Result<String, Error> {
    let data = ExtendedKeyData::decode(xkey)?;
    Ok(data.with_version(target.version()).to_base58())
}

/// Converts an extended key into `target` prefix, requiring both the source
/// and the target prefixes to belong to the same network and key kind.
pub fn convert_checked(xkey: &str, target: KeyPrefix) -> Result<String, Error> {
    let source = KeyPrefix::from_xkey_str(xkey)?;
    if !source.valid_targets().contains(&target) {
        return Err(Error::MismatchedConversionGroup(source, target));
    }
    convert(xkey, target)
}

/// Converts an extended key into its normalized form (`xprv`, `xpub`, `tprv`
/// or `tpub`).
pub fn normalize(xkey: &str) -> Result<String, Error> {
    let prefix = KeyPrefix::from_xkey_str(xkey)?;
    convert(xkey, prefix.normalized())
}

/// Trait for building standard BIP32 extended keys from SLIP132 variant.
pub trait FromSlip132 {
    /// Constructs standard BIP32 extended key from SLIP132 string.
    fn from_slip132_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized;
}

fn normalized_payload(s: &str, private: bool) -> Result<[u8; EXTENDED_KEY_LEN], Error> {
    let data = ExtendedKeyData::decode(s)?;
    let prefix = data.prefix().ok_or(Error::UnknownVersion(data.version))?;
    if prefix.is_private() != private {
        return Err(Error::UnexpectedKeyKind(prefix));
    }
    Ok(data.with_version(prefix.normalized().version()).encode())
}

impl FromSlip132 for ExtendedPubKey {
    fn from_slip132_str(s: &str) -> Result<Self, Error> {
        let data = normalized_payload(s, false)?;
        Ok(ExtendedPubKey::decode(&data)?)
    }
}

impl FromSlip132 for ExtendedPrivKey {
    fn from_slip132_str(s: &str) -> Result<Self, Error> {
        let data = normalized_payload(s, true)?;
        Ok(ExtendedPrivKey::decode(&data)?)
    }
}

/// Trait converting standard BIP32 extended keys into SLIP132 representation.
pub trait ToSlip132 {
    /// Creates SLIP132 key representation for the given prefix. The caller is
    /// responsible for picking a prefix of a matching key kind.
    fn to_slip132_string(&self, prefix: KeyPrefix) -> String;
}

impl ToSlip132 for ExtendedPubKey {
    fn to_slip132_string(&self, prefix: KeyPrefix) -> String {
        let mut xpub = self.encode();
        xpub[0..4].copy_from_slice(prefix.version().as_slice());
        base58::check_encode_slice(&xpub)
    }
}

impl ToSlip132 for ExtendedPrivKey {
    fn to_slip132_string(&self, prefix: KeyPrefix) -> String {
        let mut xpriv = self.encode();
        xpriv[0..4].copy_from_slice(prefix.version().as_slice());
        base58::check_encode_slice(&xpriv)
    }
}
