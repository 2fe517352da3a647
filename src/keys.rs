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

//! WIF codec and key validity checks.

use bitcoin::util::base58;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::{Error, Network, NetworkParams, Node};

/// Decodes WIF private key into raw 32 bytes. Both compressed and
/// uncompressed forms are accepted, for any network.
pub fn wif_to_private_key(wif: &str) -> Result<[u8; 32], Error> {
    let data = base58::from_check(wif.trim())?;
    let key = match data.len() {
        33 => &data[1..],
        34 => &data[1..33],
        len => return Err(Error::InvalidPrivateKeyLength(len.saturating_sub(1))),
    };
    let mut secret = [0u8; 32];
    secret.copy_from_slice(key);
    Ok(secret)
}

/// Encodes private key in compressed WIF form for the network
pub fn private_key_to_wif(key: &SecretKey, params: &NetworkParams) -> String {
    let mut data = Vec::with_capacity(34);
    data.push(params.wif);
    data.extend_from_slice(&key.secret_bytes());
    data.push(0x01);
    base58::check_encode_slice(&data)
}

/// Checks that an extended key of any SLIP-132 prefix decodes for `network`
/// into a valid public key or private scalar
pub fn is_valid_ext_key(xkey: &str, network: Network) -> bool {
    let secp = Secp256k1::new();
    Node::from_base58(&secp, xkey, network).is_ok()
}

/// Checks that bytes encode a point on the secp256k1 curve, in compressed or
/// uncompressed form
pub fn is_valid_public_key(data: &[u8]) -> bool { PublicKey::from_slice(data).is_ok() }

/// Checks that bytes encode a scalar in `1..n`, where `n` is the curve order
pub fn is_valid_private_key(data: &[u8]) -> bool { SecretKey::from_slice(data).is_ok() }

#[cfg(test)]
mod test {
    use bitcoin::hashes::hex::{FromHex, ToHex};

    use super::*;

    #[test]
    fn wif_decode() {
        assert_eq!(
            wif_to_private_key("5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ")
                .unwrap()
                .to_hex(),
            "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d"
        );
        assert_eq!(
            wif_to_private_key("cTiN5q13XR9ebmqfXbaCbz2x6C6inEJWqoJ5jP4CCw98ZCJ4gkuN")
                .unwrap()
                .to_hex(),
            "b6f762e107af1dd4c73f7f1ce84298d71ec07a0a66fb8d8f24551f99435af082"
        );
        assert!(matches!(
            wif_to_private_key("5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTj"),
            Err(Error::Base58(_))
        ));
        let short = base58::check_encode_slice(&[0x80, 1, 2, 3]);
        assert_eq!(wif_to_private_key(&short), Err(Error::InvalidPrivateKeyLength(3)));
    }

    #[test]
    fn wif_encode() {
        let key = SecretKey::from_slice(
            &Vec::<u8>::from_hex("b6f762e107af1dd4c73f7f1ce84298d71ec07a0a66fb8d8f24551f99435af082")
                .unwrap(),
        )
        .unwrap();
        assert_eq!(
            private_key_to_wif(&key, Network::BtcTest.params()),
            "cTiN5q13XR9ebmqfXbaCbz2x6C6inEJWqoJ5jP4CCw98ZCJ4gkuN"
        );
        assert_eq!(
            private_key_to_wif(&key, Network::Btc.params()),
            "L3MNcv1C6MTPSLNQ9Bm5EfXtTxoK7nCpmm9ccxbghpV8JTCCGUCz"
        );
        assert_eq!(
            private_key_to_wif(&key, Network::Ltc.params()),
            "T9Be4fJNVjRzDB1GgphwT25GQpSdBsDiay3sUmEEGnfHpLpUBwdN"
        );
    }

    #[test]
    fn validity() {
        let tpub = "tpubD6NzVbkrYhZ4WaWSyoBvQwbpLkojyoTZPRsgXELWz3Popb3qkjcJyJUGLnL4qHHoQvao8ESaAstxYSnhyswJ76uZPStJRJCTKvosUCJZL5B";
        assert!(is_valid_ext_key(tpub, Network::BtcTest));
        assert!(is_valid_ext_key(tpub, Network::LtcTest));
        assert!(!is_valid_ext_key(tpub, Network::Btc));
        assert!(!is_valid_ext_key(&tpub[..110], Network::BtcTest));
        assert!(!is_valid_ext_key("tpubD6NzVbkrYhZ4WaWSyoBvQwbpLkojyoTZPRsgXEL", Network::BtcTest));
        let tprv = "tprv8ZgxMBicQKsPd7Uf69XL1XwhmjHopUGep8GuEiJDZmbQz6o58LninorQAfcKZWARbtRtfnLcJ5MQ2AtHcQJCCRUcMRvmDUjyEmNUWwx8UbK";
        assert!(is_valid_ext_key(tprv, Network::BtcTest));
        let tprv_from_tpub = slip132::convert(tpub, slip132::KeyPrefix::Tprv).unwrap();
        assert!(!is_valid_ext_key(&tprv_from_tpub, Network::BtcTest));
        let tpub_from_tprv = slip132::convert(tprv, slip132::KeyPrefix::Tpub).unwrap();
        assert!(!is_valid_ext_key(&tpub_from_tprv, Network::BtcTest));

        let pubkey =
            Vec::<u8>::from_hex("02c97dc3f4420402e01a113984311bf4a1b8de376cac0bdcfaf1b3ac81f13433c7")
                .unwrap();
        assert!(is_valid_public_key(&pubkey));
        assert!(!is_valid_public_key(&pubkey[..32]));
        let mut off_curve = pubkey.clone();
        off_curve[0] = 0x05;
        assert!(!is_valid_public_key(&off_curve));

        assert!(is_valid_private_key(&[1u8; 32]));
        assert!(!is_valid_private_key(&[0u8; 32]));
        assert!(!is_valid_private_key(&[0xffu8; 32]));
        assert!(!is_valid_private_key(&[1u8; 31]));
    }
}
