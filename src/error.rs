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

use bitcoin::blockdata::script;
use bitcoin::hashes::hex;
use bitcoin::util::{base58, bip32};
use slip132::KeyPrefix;

use crate::path::PathError;
use crate::Network;

/// Errors of key conversion, derivation and address construction
#[derive(Clone, PartialEq, Eq, Debug, Display, From, Error)]
#[display(doc_comments)]
pub enum Error {
    /// {0}
    #[from]
    Slip132(slip132::Error),

    /// {0}
    #[from]
    Path(PathError),

    /// invalid Base58Check data: {0}
    #[from]
    Base58(base58::Error),

    /// BIP32 failure: {0}
    #[from]
    Bip32(bip32::Error),

    /// invalid secp256k1 key: {0}
    #[from]
    Secp256k1(secp256k1::Error),

    /// invalid hex data: {0}
    #[from]
    Hex(hex::Error),

    /// bech32 encoding failure: {0}
    #[from]
    Bech32(bech32::Error),

    /// malformed script: {0}
    #[from]
    Script(script::Error),

    /// private key has invalid length {0} (32 bytes expected)
    InvalidPrivateKeyLength(usize),

    /// public key has invalid length {0} (33-byte compressed key expected)
    InvalidPublicKeyLength(usize),

    /// unknown column `{0}`; valid columns are path, depth, p2pkh, legacy,
    /// p2sh_p2wpkh, p2wpkh, bech32, xprv, xpub, privkey, pubkey, pubkey_hash,
    /// wif, fingerprint or `all`
    UnknownColumn(String),

    /// unknown network `{0}`; use one of btc, btctest, ltc, ltctest (or
    /// mainnet, testnet where accepted)
    InvalidNetwork(String),

    /// `{0}` extended key can't be used on {1} network
    NetworkMismatch(KeyPrefix, Network),

    /// multisig threshold {0} is out of range for {1} public key(s)
    ThresholdOutOfRange(usize, usize),

    /// {0} public keys exceed the limit of 16 keys for a bare multisig script
    TooManyKeys(usize),

    /// extended keys for a multisig must belong to the same network
    MixedNetworks,

    /// unknown multisig kind `{0}`; use one of p2sh, p2wsh, p2shp2wsh
    UnknownMultisigKind(String),

    /// unknown public key order `{0}`; use either sorted or as-provided
    UnknownKeyOrder(String),

    /// unsupported mnemonic language `{0}`; use one of en, es, fr, it, jp, ko
    UnknownLanguage(String),

    /// mnemonic generation failure: {0}
    Mnemonic(String),
}
