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

//! Address encodings for single keys and scripts, parametrized by
//! [`NetworkParams`] so that litecoin networks share the code with bitcoin.

use bech32::{u5, ToBase32, Variant};
use bitcoin::blockdata::script::Script;
use bitcoin::hashes::hex::FromHex;
use bitcoin::hashes::{hash160, Hash};
use bitcoin::util::base58;
use bitcoin::util::bip32::ExtendedPubKey;
use bitcoin::{PubkeyHash, WPubkeyHash};
use secp256k1::{KeyPair, PublicKey};

use crate::{Error, NetworkParams, Node};

/// Anything an address can be computed for
pub trait HasPublicKey {
    /// Public key to commit to
    fn public_key(&self) -> PublicKey;
}

impl HasPublicKey for PublicKey {
    fn public_key(&self) -> PublicKey { *self }
}

impl HasPublicKey for bitcoin::PublicKey {
    fn public_key(&self) -> PublicKey { self.inner }
}

impl HasPublicKey for ExtendedPubKey {
    fn public_key(&self) -> PublicKey { self.public_key }
}

impl HasPublicKey for KeyPair {
    fn public_key(&self) -> PublicKey { PublicKey::from_keypair(self) }
}

impl HasPublicKey for Node {
    fn public_key(&self) -> PublicKey { Node::public_key(self) }
}

/// Parses serialized public key, either compressed or uncompressed
pub fn public_key_from_slice(data: &[u8]) -> Result<PublicKey, Error> {
    Ok(PublicKey::from_slice(data)?)
}

/// Parses hex-encoded public key, either compressed or uncompressed
pub fn public_key_from_hex(hex: &str) -> Result<PublicKey, Error> {
    let data = Vec::<u8>::from_hex(hex.trim())?;
    public_key_from_slice(&data)
}

/// RIPEMD160 of SHA256 of the compressed public key
pub fn hash160(key: &impl HasPublicKey) -> [u8; 20] {
    hash160::Hash::hash(&key.public_key().serialize()).into_inner()
}

/// Legacy pay-to-public-key-hash address
pub fn p2pkh(key: &impl HasPublicKey, params: &NetworkParams) -> String {
    let hash = PubkeyHash::hash(&key.public_key().serialize());
    base58_address(params.pubkey_hash, &hash.into_inner())
}

/// Pay-to-witness-public-key-hash nested into pay-to-script-hash
pub fn p2sh_p2wpkh(key: &impl HasPublicKey, params: &NetworkParams) -> String {
    let hash = WPubkeyHash::hash(&key.public_key().serialize());
    p2sh(&Script::new_v0_p2wpkh(&hash), params)
}

/// Native segwit v0 pay-to-witness-public-key-hash address
pub fn p2wpkh(key: &impl HasPublicKey, params: &NetworkParams) -> Result<String, Error> {
    let hash = WPubkeyHash::hash(&key.public_key().serialize());
    segwit_v0(&hash.into_inner(), params)
}

/// Pay-to-script-hash address committing to `script`
pub fn p2sh(script: &Script, params: &NetworkParams) -> String {
    base58_address(params.script_hash, &script.script_hash().into_inner())
}

/// Native segwit v0 pay-to-witness-script-hash address committing to `script`
pub fn p2wsh(script: &Script, params: &NetworkParams) -> Result<String, Error> {
    segwit_v0(&script.wscript_hash().into_inner(), params)
}

fn base58_address(version: u8, hash: &[u8]) -> String {
    let mut data = Vec::with_capacity(hash.len() + 1);
    data.push(version);
    data.extend_from_slice(hash);
    base58::check_encode_slice(&data)
}

fn segwit_v0(program: &[u8], params: &NetworkParams) -> Result<String, Error> {
    let mut data = vec![u5::try_from_u8(0)?];
    data.extend(program.to_base32());
    Ok(bech32::encode(params.bech32_hrp, data, Variant::Bech32)?)
}
