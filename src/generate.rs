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

//! Generation of fresh mnemonics, seeds, master keys and key pairs.

use std::str::FromStr;

use bip39::{Language, Mnemonic};
use bitcoin::hashes::hex::ToHex;
use bitcoin::util::bip32::{ExtendedPrivKey, ExtendedPubKey};
use secp256k1::rand::{thread_rng, RngCore};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use slip132::{KeyPrefix, ToSlip132};

use crate::keys::private_key_to_wif;
use crate::{Error, Network};

/// Length of a generated random seed, in bytes
pub const SEED_LEN: usize = 64;

/// Word counts BIP39 defines
pub const MNEMONIC_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Word list language for mnemonic generation
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "lowercase")
)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, Default)]
pub enum MnemonicLanguage {
    /// English
    #[default]
    #[display("en")]
    En,

    /// Spanish
    #[display("es")]
    Es,

    /// French
    #[display("fr")]
    Fr,

    /// Italian
    #[display("it")]
    It,

    /// Japanese
    #[display("jp")]
    Jp,

    /// Korean
    #[display("ko")]
    Ko,
}

impl FromStr for MnemonicLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "en" | "english" => MnemonicLanguage::En,
            "es" | "spanish" => MnemonicLanguage::Es,
            "fr" | "french" => MnemonicLanguage::Fr,
            "it" | "italian" => MnemonicLanguage::It,
            "jp" | "ja" | "japanese" => MnemonicLanguage::Jp,
            "ko" | "korean" => MnemonicLanguage::Ko,
            _ => return Err(Error::UnknownLanguage(s.to_owned())),
        })
    }
}

impl From<MnemonicLanguage> for Language {
    fn from(lang: MnemonicLanguage) -> Self {
        match lang {
            MnemonicLanguage::En => Language::English,
            MnemonicLanguage::Es => Language::Spanish,
            MnemonicLanguage::Fr => Language::French,
            MnemonicLanguage::It => Language::Italian,
            MnemonicLanguage::Jp => Language::Japanese,
            MnemonicLanguage::Ko => Language::Korean,
        }
    }
}

/// Freshly generated secret key with its encodings
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct KeyPair {
    /// Compressed WIF for the requested network
    pub wif: String,

    /// Hex-encoded 32-byte secret
    pub private_key: String,

    /// Hex-encoded compressed public key
    pub public_key: String,
}

/// Generates random BIP39 mnemonic of `words` words
pub fn generate_mnemonic(lang: MnemonicLanguage, words: usize) -> Result<String, Error> {
    if !MNEMONIC_WORD_COUNTS.contains(&words) {
        return Err(Error::Mnemonic(format!(
            "{} words requested while a mnemonic has 12, 15, 18, 21 or 24 words",
            words
        )));
    }
    let mut entropy = vec![0u8; words / 3 * 4];
    thread_rng().fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(lang.into(), &entropy)
        .map_err(|err| Error::Mnemonic(err.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Computes 64-byte BIP39 seed for a mnemonic phrase in any supported
/// language
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<[u8; SEED_LEN], Error> {
    let mnemonic = Mnemonic::parse(phrase.trim()).map_err(|err| Error::Mnemonic(err.to_string()))?;
    Ok(mnemonic.to_seed(passphrase))
}

/// Generates BIP39 seed of a fresh 24-word English mnemonic with an empty
/// passphrase, hex-encoded
pub fn generate_seed() -> Result<String, Error> {
    let phrase = generate_mnemonic(MnemonicLanguage::En, 24)?;
    Ok(mnemonic_to_seed(&phrase, "")?.to_hex())
}

/// Master extended key for the seed, encoded with `prefix`. Public prefixes
/// give the neutered master key.
pub fn seed_to_root(seed: &[u8], prefix: KeyPrefix) -> Result<String, Error> {
    let xprv = ExtendedPrivKey::new_master(prefix.network(), seed)?;
    Ok(if prefix.is_private() {
        xprv.to_slip132_string(prefix)
    } else {
        let secp = Secp256k1::signing_only();
        ExtendedPubKey::from_priv(&secp, &xprv).to_slip132_string(prefix)
    })
}

/// Generates master extended key from a fresh random seed
pub fn generate_ext_key(prefix: KeyPrefix) -> Result<String, Error> {
    let mut seed = [0u8; SEED_LEN];
    thread_rng().fill_bytes(&mut seed);
    seed_to_root(&seed, prefix)
}

/// Generates random secret key
pub fn generate_key_pair(network: Network) -> KeyPair {
    let secp = Secp256k1::signing_only();
    let secret = SecretKey::new(&mut thread_rng());
    key_pair(&secp, &secret, network)
}

fn key_pair(secp: &Secp256k1<secp256k1::SignOnly>, secret: &SecretKey, network: Network) -> KeyPair {
    KeyPair {
        wif: private_key_to_wif(secret, network.params()),
        private_key: secret.secret_bytes().to_hex(),
        public_key: PublicKey::from_secret_key(secp, secret).serialize().to_hex(),
    }
}

#[cfg(test)]
mod test {
    use bitcoin::hashes::hex::FromHex;

    use super::*;
    use crate::{is_valid_ext_key, wif_to_private_key};

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon \
                           abandon abandon abandon about";

    #[test]
    fn mnemonic_words() {
        for words in MNEMONIC_WORD_COUNTS {
            for lang in [MnemonicLanguage::En, MnemonicLanguage::Es, MnemonicLanguage::Ko] {
                let phrase = generate_mnemonic(lang, words).unwrap();
                assert_eq!(phrase.split_whitespace().count(), words);
                assert!(mnemonic_to_seed(&phrase, "").is_ok());
            }
        }
        assert!(matches!(
            generate_mnemonic(MnemonicLanguage::En, 13),
            Err(Error::Mnemonic(_))
        ));
        assert_ne!(
            generate_mnemonic(MnemonicLanguage::En, 12).unwrap(),
            generate_mnemonic(MnemonicLanguage::En, 12).unwrap()
        );
    }

    #[test]
    fn languages() {
        assert_eq!("jp".parse::<MnemonicLanguage>().unwrap(), MnemonicLanguage::Jp);
        assert_eq!("FR".parse::<MnemonicLanguage>().unwrap(), MnemonicLanguage::Fr);
        assert_eq!(
            "cn".parse::<MnemonicLanguage>(),
            Err(Error::UnknownLanguage(s!("cn")))
        );
        assert_eq!(Language::from(MnemonicLanguage::default()), Language::English);
    }

    #[test]
    fn seed_from_mnemonic() {
        assert_eq!(
            mnemonic_to_seed(ABANDON, "").unwrap().to_hex(),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
        assert!(mnemonic_to_seed("abandon abandon", "").is_err());
    }

    #[test]
    fn master_keys() {
        let seed = mnemonic_to_seed(ABANDON, "").unwrap();
        assert_eq!(
            seed_to_root(&seed, KeyPrefix::Xprv).unwrap(),
            "xprv9s21ZrQH143K3GJpoapnV8SFfukcVBSfeCficPSGfubmSFDxo1kuHnLisriDvSnRRuL2Qrg5ggqHKNVpxR86QEC8w35uxmGoggxtQTPvfUu"
        );
        assert_eq!(
            seed_to_root(&seed, KeyPrefix::Xpub).unwrap(),
            "xpub661MyMwAqRbcFkPHucMnrGNzDwb6teAX1RbKQmqtEF8kK3Z7LZ59qafCjB9eCRLiTVG3uxBxgKvRgbubRhqSKXnGGb1aoaqLrpMBDrVxga8"
        );
        assert_eq!(
            seed_to_root(&seed, KeyPrefix::Zprv).unwrap(),
            "zprvAWgYBBk7JR8Gjrh4UJQ2uJdG1r3WNRRfURiABBE3RvMXYSrRJL62XuezvGdPvG6GFBZduosCc1YP5wixPox7zhZLfiUm8aunE96BBa4Kei5"
        );
        assert_eq!(
            seed_to_root(&seed, KeyPrefix::Zpub).unwrap(),
            "zpub6jftahH18ngZxLmXaKw3GSZzZsszmt9WqedkyZdezFtWRFBZqsQH5hyUmb4pCEeZGmVfQuP5bedXTB8is6fTv19U1GQRyQUKQGUTzyHACMF"
        );
        assert_eq!(
            seed_to_root(&seed, KeyPrefix::Tprv).unwrap(),
            "tprv8ZgxMBicQKsPe5YMU9gHen4Ez3ApihUfykaqUorj9t6FDqy3nP6eoXiAo2ssvpAjoLroQxHqr3R5nE3a5dU3DHTjTgJDd7zrbniJr6nrCzd"
        );

        let seed = Vec::<u8>::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        assert_eq!(
            seed_to_root(&seed, KeyPrefix::Xprv).unwrap(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            seed_to_root(&seed, KeyPrefix::Xpub).unwrap(),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );
    }

    #[test]
    fn random_material() {
        let seed = generate_seed().unwrap();
        assert_eq!(seed.len(), SEED_LEN * 2);
        assert_ne!(seed, generate_seed().unwrap());

        for prefix in [KeyPrefix::Xprv, KeyPrefix::Ypub, KeyPrefix::Vprv, KeyPrefix::Tpub] {
            let xkey = generate_ext_key(prefix).unwrap();
            assert_eq!(KeyPrefix::from_xkey_str(&xkey).unwrap(), prefix);
            assert!(is_valid_ext_key(&xkey, Network::with_prefix(prefix)));
        }

        let pair = generate_key_pair(Network::Ltc);
        assert!(pair.wif.starts_with('T'));
        assert_eq!(wif_to_private_key(&pair.wif).unwrap().to_hex(), pair.private_key);
        assert_eq!(pair.public_key.len(), 66);
    }

    #[test]
    fn deterministic_key_pair() {
        let secp = Secp256k1::signing_only();
        let secret = SecretKey::from_slice(
            &Vec::<u8>::from_hex("b6f762e107af1dd4c73f7f1ce84298d71ec07a0a66fb8d8f24551f99435af082")
                .unwrap(),
        )
        .unwrap();
        let pair = key_pair(&secp, &secret, Network::BtcTest);
        assert_eq!(pair.wif, "cTiN5q13XR9ebmqfXbaCbz2x6C6inEJWqoJ5jP4CCw98ZCJ4gkuN");
        assert_eq!(
            pair.private_key,
            "b6f762e107af1dd4c73f7f1ce84298d71ec07a0a66fb8d8f24551f99435af082"
        );
    }
}
