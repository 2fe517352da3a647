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

use bitcoin::util::base58;
use bitcoin::util::bip32::{ExtendedPrivKey, ExtendedPubKey};
use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing, Verification};
use slip132::{ExtendedKeyData, KeyPrefix, KeyVersion};

use crate::keys::private_key_to_wif;
use crate::{Error, Network, NetworkParams};

/// BIP32 node: an extended public key, optionally accompanied by its
/// extended private key.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Node {
    xpub: ExtendedPubKey,
    xprv: Option<ExtendedPrivKey>,
}

impl From<ExtendedPubKey> for Node {
    fn from(xpub: ExtendedPubKey) -> Self { Node { xpub, xprv: None } }
}

impl Node {
    /// Constructs node from a private extended key
    pub fn with_xprv<C: Signing>(secp: &Secp256k1<C>, xprv: ExtendedPrivKey) -> Node {
        Node {
            xpub: ExtendedPubKey::from_priv(secp, &xprv),
            xprv: Some(xprv),
        }
    }

    /// Parses any of the SLIP-132 extended keys. The key is normalized first
    /// and then must carry the BIP32 versions of `network`.
    pub fn from_base58<C: Signing>(
        secp: &Secp256k1<C>,
        xkey: &str,
        network: Network,
    ) -> Result<Node, Error> {
        let prefix = KeyPrefix::from_xkey_str(xkey)?;
        let normalized = slip132::normalize(xkey)?;
        let data = ExtendedKeyData::decode(&normalized)?;
        if !network.params().accepts(data.version) {
            return Err(Error::NetworkMismatch(prefix, network));
        }
        if data.has_private_key() != prefix.is_private() {
            return Err(slip132::Error::UnexpectedKeyKind(prefix).into());
        }
        let payload = data.encode();
        if prefix.is_private() {
            let xprv = ExtendedPrivKey::decode(&payload)?;
            Ok(Node::with_xprv(secp, xprv))
        } else {
            Ok(Node::from(ExtendedPubKey::decode(&payload)?))
        }
    }

    /// Derives child node along the path, re-deriving from this node
    pub fn derive<C: Signing + Verification>(
        &self,
        secp: &Secp256k1<C>,
        path: &crate::DerivationPath,
    ) -> Result<Node, Error> {
        let children = path.child_numbers();
        Ok(match self.xprv {
            Some(xprv) => Node::with_xprv(secp, xprv.derive_priv(secp, &children)?),
            None => Node::from(self.xpub.derive_pub(secp, &children)?),
        })
    }

    /// Compressed public key of the node
    #[inline]
    pub fn public_key(&self) -> PublicKey { self.xpub.public_key }

    /// Private key, unless the node is neutered
    #[inline]
    pub fn private_key(&self) -> Option<SecretKey> { self.xprv.map(|xprv| xprv.private_key) }

    /// Depth in the derivation tree
    #[inline]
    pub fn depth(&self) -> u8 { self.xpub.depth }

    /// First four bytes of the public key hash160
    pub fn fingerprint(&self) -> [u8; 4] {
        let hash = crate::address::hash160(&self.xpub.public_key);
        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&hash[..4]);
        fingerprint
    }

    /// Detects whether the node carries no private key
    #[inline]
    pub fn is_neutered(&self) -> bool { self.xprv.is_none() }

    /// Public-only copy of the node
    #[inline]
    pub fn neutered(&self) -> Node { Node::from(self.xpub) }

    /// Extended public key
    #[inline]
    pub fn xpub(&self) -> ExtendedPubKey { self.xpub }

    /// Extended private key, unless the node is neutered
    #[inline]
    pub fn xprv(&self) -> Option<ExtendedPrivKey> { self.xprv }

    /// Serializes the node with the network versions: private form when the
    /// private key is present, public one otherwise
    pub fn to_base58(&self, params: &NetworkParams) -> String {
        match self.xprv {
            Some(xprv) => encode_with_version(xprv.encode(), params.bip32_private),
            None => self.to_base58_public(params),
        }
    }

    /// Serializes the extended public key with the network version
    pub fn to_base58_public(&self, params: &NetworkParams) -> String {
        encode_with_version(self.xpub.encode(), params.bip32_public)
    }

    /// Compressed WIF encoding of the private key
    pub fn to_wif(&self, params: &NetworkParams) -> Option<String> {
        self.private_key().map(|key| private_key_to_wif(&key, params))
    }
}

fn encode_with_version(mut data: [u8; 78], version: KeyVersion) -> String {
    data[0..4].copy_from_slice(version.as_slice());
    base58::check_encode_slice(&data)
}
