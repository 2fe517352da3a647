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

//! Bare multisig scripts and their P2SH, P2WSH and P2SH-P2WSH addresses.

use std::str::FromStr;

use bitcoin::blockdata::opcodes::all::OP_CHECKMULTISIG;
use bitcoin::blockdata::script::{Builder, Instruction, Script};
use bitcoin::hashes::hex::{FromHex, ToHex};
use secp256k1::{PublicKey, Secp256k1};
use slip132::KeyPrefix;

use crate::{address, DerivationPath, Error, Network, Node};

/// Maximum number of keys `OP_CHECKMULTISIG` accepts in a script built with
/// small-integer opcodes
pub const MAX_MULTISIG_KEYS: usize = 16;

/// Output type wrapping the multisig script
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "lowercase")
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display, Default)]
pub enum MultisigKind {
    /// Pay to script hash
    #[default]
    #[display("p2sh")]
    P2sh,

    /// Pay to witness script hash
    #[display("p2wsh")]
    P2wsh,

    /// Pay to witness script hash nested in pay to script hash
    #[display("p2shp2wsh")]
    P2shP2wsh,
}

impl FromStr for MultisigKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "p2sh" => MultisigKind::P2sh,
            "p2wsh" => MultisigKind::P2wsh,
            "p2shp2wsh" | "p2sh-p2wsh" | "p2sh_p2wsh" => MultisigKind::P2shP2wsh,
            _ => return Err(Error::UnknownMultisigKind(s.to_owned())),
        })
    }
}

/// Order of public keys inside the multisig script
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display, Default)]
pub enum KeyOrder {
    /// Sorted by serialized byte value, so any permutation of the same keys
    /// gives the same script
    #[default]
    #[display("sorted")]
    Sorted,

    /// Order in which keys were supplied
    #[display("as-provided")]
    AsProvided,
}

impl FromStr for KeyOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "sorted" => KeyOrder::Sorted,
            "as-provided" | "provided" => KeyOrder::AsProvided,
            _ => return Err(Error::UnknownKeyOrder(s.to_owned())),
        })
    }
}

/// Multisig address together with the data needed to spend from it
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MultisigRecord {
    /// Address string
    pub address: String,

    /// Type tag in `<kind>-<threshold>-of-<keys>` form
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub descriptor: String,

    /// Hex-encoded compressed public keys, in script order
    pub public_keys: Vec<String>,

    /// Hex-encoded output script
    pub script_pub_key: String,

    /// Hex-encoded bare multisig script
    pub redeem: String,

    /// Disassembled bare multisig script
    #[cfg_attr(feature = "serde", serde(rename = "redeemASM"))]
    pub redeem_asm: String,

    /// Derivation path the public keys were derived at
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub path: Option<String>,
}

/// Parses hex-encoded public keys for a multisig script. Only the 33-byte
/// compressed form is accepted.
pub fn parse_public_keys(keys: &[impl AsRef<str>]) -> Result<Vec<PublicKey>, Error> {
    keys.iter()
        .map(|key| {
            let data = Vec::<u8>::from_hex(key.as_ref().trim())?;
            if data.len() != secp256k1::constants::PUBLIC_KEY_SIZE {
                return Err(Error::InvalidPublicKeyLength(data.len()));
            }
            address::public_key_from_slice(&data)
        })
        .collect()
}

/// Builds `threshold`-of-N multisig from public keys
pub fn build_multisig(
    kind: MultisigKind,
    threshold: usize,
    public_keys: &[PublicKey],
    order: KeyOrder,
    network: Network,
) -> Result<MultisigRecord, Error> {
    let total = public_keys.len();
    if threshold < 1 || threshold > total {
        return Err(Error::ThresholdOutOfRange(threshold, total));
    }
    if total > MAX_MULTISIG_KEYS {
        return Err(Error::TooManyKeys(total));
    }

    let mut keys = public_keys.iter().map(PublicKey::serialize).collect::<Vec<_>>();
    if order == KeyOrder::Sorted {
        keys.sort_unstable();
    }

    let script = keys
        .iter()
        .fold(Builder::new().push_int(threshold as i64), |builder, key| builder.push_slice(key))
        .push_int(total as i64)
        .push_opcode(OP_CHECKMULTISIG)
        .into_script();

    let params = network.params();
    let (address, script_pubkey) = match kind {
        MultisigKind::P2sh => (address::p2sh(&script, params), script.to_p2sh()),
        MultisigKind::P2wsh => (address::p2wsh(&script, params)?, script.to_v0_p2wsh()),
        MultisigKind::P2shP2wsh => {
            let witness_program = script.to_v0_p2wsh();
            (address::p2sh(&witness_program, params), witness_program.to_p2sh())
        }
    };

    Ok(MultisigRecord {
        address,
        descriptor: format!("{}-{}-of-{}", kind, threshold, total),
        public_keys: keys.iter().map(|key| key.to_hex()).collect(),
        script_pub_key: script_pubkey.as_bytes().to_hex(),
        redeem: script.as_bytes().to_hex(),
        redeem_asm: disassemble(&script)?,
        path: None,
    })
}

/// Derives `count` sequential multisig records from extended keys. Each
/// iteration derives every key at the same path and advances the path
/// cursor by one.
pub fn derive_multisig(
    kind: MultisigKind,
    threshold: usize,
    xkeys: &[String],
    path: &DerivationPath,
    count: u32,
    order: KeyOrder,
) -> Result<Vec<MultisigRecord>, Error> {
    let network = infer_network(xkeys)?;
    let secp = Secp256k1::new();
    let roots = xkeys
        .iter()
        .map(|xkey| Node::from_base58(&secp, xkey, network))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(%kind, threshold, keys = roots.len(), %network, %path, count, "deriving multisig addresses");

    let mut path = path.clone();
    let mut records = Vec::new();
    for no in 0..count {
        if no > 0 {
            path = path.with_incremented_last(1)?;
        }
        let public_keys = roots
            .iter()
            .map(|root| root.derive(&secp, &path).map(|node| node.public_key()))
            .collect::<Result<Vec<_>, _>>()?;
        let mut record = build_multisig(kind, threshold, &public_keys, order, network)?;
        record.path = Some(path.to_string());
        trace!(path = %path, address = %record.address, "derived multisig");
        records.push(record);
    }
    Ok(records)
}

/// Detects bitcoin network of extended keys from their prefixes, failing if
/// the keys belong to different networks
pub fn infer_network(xkeys: &[String]) -> Result<Network, Error> {
    let mut networks = xkeys
        .iter()
        .map(|xkey| KeyPrefix::from_xkey_str(xkey).map(Network::with_prefix));
    let first = match networks.next() {
        Some(network) => network?,
        None => return Err(Error::ThresholdOutOfRange(0, 0)),
    };
    for network in networks {
        if network? != first {
            return Err(Error::MixedNetworks);
        }
    }
    Ok(first)
}

fn disassemble(script: &Script) -> Result<String, Error> {
    let mut asm = Vec::new();
    for instruction in script.instructions() {
        asm.push(match instruction? {
            Instruction::PushBytes(data) => data.to_hex(),
            Instruction::Op(op) => match op.to_u8() {
                code @ 0x51..=0x60 => format!("OP_{}", code - 0x50),
                _ => format!("{:?}", op),
            },
        });
    }
    Ok(asm.join(" "))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::address::public_key_from_hex;

    const KEYS: [&str; 3] = [
        "02c97dc3f4420402e01a113984311bf4a1b8de376cac0bdcfaf1b3ac81f13433c7",
        "03db2cbac96f03440f9e7a58f43f62d3e71b90d6b4b202bd75c0ec096d4d71efe0",
        "023a04b2aaadfa39488dafe77a18b123f00300cc2ddcf99ae8c2114b5bf6c29772",
    ];
    const TPUBS: [&str; 3] = [
        "tpubD6NzVbkrYhZ4WaWSyoBvQwbpLkojyoTZPRsgXELWz3Popb3qkjcJyJUGLnL4qHHoQvao8ESaAstxYSnhyswJ76uZPStJRJCTKvosUCJZL5B",
        "tpubD6NzVbkrYhZ4X1MhK22bdUwGstuq9gRABHLoRkm8yUMrS5WJSoo3W13RLbNBzcimJtQiYs8Nc41V9VCKEy5Y793eKK1TvkzSTAxr86wyMuW",
        "tpubD6NzVbkrYhZ4Y3gMUefyddFS1Uob6tMSToYiLLzuWEfCs1KtTFVGZndPxiPaVPtaYebRCsSXdYZ43mWN2LnariYSWnLvLUkyQchghCcTN32",
    ];
    const REDEEM_AS_PROVIDED: &str = "522102c97dc3f4420402e01a113984311bf4a1b8de376cac0bdcfaf1b3ac81f13433c72103db2cbac96f03440f9e7a58f43f62d3e71b90d6b4b202bd75c0ec096d4d71efe021023a04b2aaadfa39488dafe77a18b123f00300cc2ddcf99ae8c2114b5bf6c2977253ae";
    const REDEEM_SORTED: &str = "5221023a04b2aaadfa39488dafe77a18b123f00300cc2ddcf99ae8c2114b5bf6c297722102c97dc3f4420402e01a113984311bf4a1b8de376cac0bdcfaf1b3ac81f13433c72103db2cbac96f03440f9e7a58f43f62d3e71b90d6b4b202bd75c0ec096d4d71efe053ae";

    fn keys(order: [usize; 3]) -> Vec<PublicKey> {
        order.iter().map(|no| public_key_from_hex(KEYS[*no]).unwrap()).collect()
    }

    #[test]
    fn p2sh_as_provided() {
        let keys = keys([0, 1, 2]);
        let record =
            build_multisig(MultisigKind::P2sh, 2, &keys, KeyOrder::AsProvided, Network::Btc).unwrap();
        assert_eq!(record.address, "3ExNhoMK5dpdynaky5RWHphNUSDzFDVa8W");
        assert_eq!(record.descriptor, "p2sh-2-of-3");
        assert_eq!(record.redeem, REDEEM_AS_PROVIDED);
        assert_eq!(record.script_pub_key, "a9149181389b4b877aec7d7557c4300658aa9218a68887");
        assert_eq!(record.public_keys, KEYS.to_vec());
        assert_eq!(
            record.redeem_asm,
            format!("OP_2 {} {} {} OP_3 OP_CHECKMULTISIG", KEYS[0], KEYS[1], KEYS[2])
        );
        assert_eq!(record.path, None);

        let record =
            build_multisig(MultisigKind::P2sh, 2, &keys, KeyOrder::AsProvided, Network::BtcTest)
                .unwrap();
        assert_eq!(record.address, "2N6WamYHLh6KzBaDJeD3NumgdgnSA5qNqW2");

        let record =
            build_multisig(MultisigKind::P2sh, 2, &keys, KeyOrder::AsProvided, Network::Ltc).unwrap();
        assert_eq!(record.address, "MMAX1gmH2kg4nHrf4xQr7Twmo8pSFMBNAD");
    }

    #[test]
    fn segwit_as_provided() {
        let keys = keys([0, 1, 2]);
        let record =
            build_multisig(MultisigKind::P2wsh, 2, &keys, KeyOrder::AsProvided, Network::Btc).unwrap();
        assert_eq!(
            record.address,
            "bc1q2pnadjwshn72xeeh53d33hdz0rnmeseg4varj37eu0gz5tujvd9qvkvpt3"
        );
        assert_eq!(
            record.script_pub_key,
            "00205067d6c9d0bcfca36737a45b18dda278e7bcc328ab3a3947d9e3d02a2f92634a"
        );
        assert_eq!(record.descriptor, "p2wsh-2-of-3");
        assert_eq!(record.redeem, REDEEM_AS_PROVIDED);

        let record =
            build_multisig(MultisigKind::P2shP2wsh, 2, &keys, KeyOrder::AsProvided, Network::Btc)
                .unwrap();
        assert_eq!(record.address, "32RjwpngvKSacsT9FAPey97keLfVhZ4Yq3");
        assert_eq!(record.script_pub_key, "a91408148c756080ea3bf0f35ee864a68cc165c892a087");
        assert_eq!(record.descriptor, "p2shp2wsh-2-of-3");
        assert_eq!(record.redeem, REDEEM_AS_PROVIDED);

        let testnet = |kind| {
            build_multisig(kind, 2, &keys, KeyOrder::AsProvided, Network::BtcTest)
                .unwrap()
                .address
        };
        assert_eq!(
            testnet(MultisigKind::P2wsh),
            "tb1q2pnadjwshn72xeeh53d33hdz0rnmeseg4varj37eu0gz5tujvd9qm76w37"
        );
        assert_eq!(testnet(MultisigKind::P2shP2wsh), "2Msyx1ZiiXmwvpf5gvJ1Xb671rgsfYRPPoH");

        let litecoin = |kind| {
            build_multisig(kind, 2, &keys, KeyOrder::AsProvided, Network::Ltc)
                .unwrap()
                .address
        };
        assert_eq!(
            litecoin(MultisigKind::P2wsh),
            "ltc1q2pnadjwshn72xeeh53d33hdz0rnmeseg4varj37eu0gz5tujvd9q0jz335"
        );
        assert_eq!(litecoin(MultisigKind::P2shP2wsh), "M8dtFiCesSJ1RNj3M3NznnN9y3FwfQ7tfy");
    }

    #[test]
    fn sorted_is_permutation_invariant() {
        let permutations =
            [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for kind in [MultisigKind::P2sh, MultisigKind::P2wsh, MultisigKind::P2shP2wsh] {
            let reference =
                build_multisig(kind, 2, &keys([0, 1, 2]), KeyOrder::default(), Network::Btc).unwrap();
            assert_eq!(reference.redeem, REDEEM_SORTED);
            for permutation in permutations {
                let record =
                    build_multisig(kind, 2, &keys(permutation), KeyOrder::Sorted, Network::Btc)
                        .unwrap();
                assert_eq!(record, reference);
            }
        }
        let sorted = |kind, network| {
            build_multisig(kind, 2, &keys([2, 1, 0]), KeyOrder::Sorted, network)
                .unwrap()
                .address
        };
        assert_eq!(sorted(MultisigKind::P2sh, Network::Btc), "36mL1rKjpTZzQchef86enbPdFxpcvDw8K4");
        assert_eq!(
            sorted(MultisigKind::P2wsh, Network::Btc),
            "bc1qzqvrjf4y0pazkfyay9yzx7gv2srjjp6403n0dl32xg4cwrwhuqfqe23dzd"
        );
        assert_eq!(
            sorted(MultisigKind::P2shP2wsh, Network::Btc),
            "361Egj5w9CWAyfMhXxBPJVVz7iYQ85TQm1"
        );
        assert_eq!(
            sorted(MultisigKind::P2sh, Network::BtcTest),
            "2MxKY5bFmRv5LcQLCLFiXQYNtUK2nmQWXLf"
        );
        assert_eq!(
            sorted(MultisigKind::P2wsh, Network::BtcTest),
            "tb1qzqvrjf4y0pazkfyay9yzx7gv2srjjp6403n0dl32xg4cwrwhuqfqwz8zcz"
        );
        assert_eq!(
            sorted(MultisigKind::P2shP2wsh, Network::BtcTest),
            "2MwZSkU1xkf1XBSzFD5oFvSVFL4kZuSqryj"
        );
    }

    #[test]
    fn threshold_bounds() {
        let keys = keys([0, 1, 2]);
        for threshold in [0, 4] {
            assert_eq!(
                build_multisig(MultisigKind::P2sh, threshold, &keys, KeyOrder::Sorted, Network::Btc),
                Err(Error::ThresholdOutOfRange(threshold, 3))
            );
        }
        assert_eq!(
            build_multisig(MultisigKind::P2sh, 1, &[], KeyOrder::Sorted, Network::Btc),
            Err(Error::ThresholdOutOfRange(1, 0))
        );
        let record =
            build_multisig(MultisigKind::P2sh, 1, &keys[..1], KeyOrder::Sorted, Network::Btc)
                .unwrap();
        assert_eq!(
            record.redeem,
            "512102c97dc3f4420402e01a113984311bf4a1b8de376cac0bdcfaf1b3ac81f13433c751ae"
        );
        assert_eq!(record.address, "3GTH1ETHXFn6D2WyJHafSjvf8UZbRbDLjm");
        assert_eq!(record.descriptor, "p2sh-1-of-1");

        let many = vec![keys[0]; 17];
        assert_eq!(
            build_multisig(MultisigKind::P2wsh, 2, &many, KeyOrder::Sorted, Network::Btc),
            Err(Error::TooManyKeys(17))
        );
    }

    #[test]
    fn derive_from_xpubs() {
        let xkeys = TPUBS.iter().map(|key| key.to_string()).collect::<Vec<_>>();
        let path = DerivationPath::new("0", false).unwrap();
        let records = derive_multisig(
            MultisigKind::P2sh,
            2,
            &xkeys,
            &path,
            2,
            KeyOrder::AsProvided,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path.as_deref(), Some("0/0"));
        assert_eq!(records[0].public_keys, KEYS.to_vec());
        assert_eq!(records[0].address, "2N6WamYHLh6KzBaDJeD3NumgdgnSA5qNqW2");
        assert_eq!(records[1].path.as_deref(), Some("0/1"));
        assert_eq!(records[1].public_keys, vec![
            "03a20a46308be0b8ded6dff0a22b10b4245c587ccf23f3b4a303885be3a524f172",
            "03c3ceeff8ec431ef2b270f68297fdd42890a24d899a958f9498cd8330abe7baf7",
            "03fca186fa1977b9217f7b1c5a3ade80510ed196e48b904906fa75bbe2e8fbda55",
        ]);
        assert_eq!(records[1].address, "2N1FP1mbQDkA7HtfudA5z6ZC5gWbXWFu8uL");

        let sorted =
            derive_multisig(MultisigKind::P2sh, 2, &xkeys, &path, 1, KeyOrder::Sorted).unwrap();
        assert_eq!(sorted[0].address, "2MxKY5bFmRv5LcQLCLFiXQYNtUK2nmQWXLf");
    }

    #[test]
    fn compressed_keys_only() {
        assert_eq!(parse_public_keys(&KEYS).unwrap(), keys([0, 1, 2]));
        let uncompressed = keys([0, 1, 2])[0].serialize_uncompressed().to_hex();
        assert_eq!(
            parse_public_keys(&[KEYS[1], uncompressed.as_str()]),
            Err(Error::InvalidPublicKeyLength(65))
        );
        assert_eq!(parse_public_keys(&["02c97d"]), Err(Error::InvalidPublicKeyLength(3)));
        assert!(matches!(parse_public_keys(&["zz"]), Err(Error::Hex(_))));
        let mut off_curve = KEYS[0].to_owned();
        off_curve.replace_range(..2, "05");
        assert!(matches!(parse_public_keys(&[off_curve]), Err(Error::Secp256k1(_))));
    }

    #[test]
    fn huge_count_fails_on_first_record() {
        let xkeys = TPUBS.iter().map(|key| key.to_string()).collect::<Vec<_>>();
        let path = DerivationPath::new("0'", false).unwrap();
        assert!(matches!(
            derive_multisig(MultisigKind::P2wsh, 2, &xkeys, &path, u32::MAX, KeyOrder::Sorted),
            Err(Error::Bip32(bitcoin::util::bip32::Error::CannotDeriveFromHardenedKey))
        ));
    }

    #[test]
    fn network_inference() {
        let mut xkeys = TPUBS.iter().map(|key| key.to_string()).collect::<Vec<_>>();
        assert_eq!(infer_network(&xkeys), Ok(Network::BtcTest));
        xkeys[1] = slip132::convert(TPUBS[1], KeyPrefix::Vpub).unwrap();
        assert_eq!(infer_network(&xkeys), Ok(Network::BtcTest));
        xkeys[2] = slip132::convert(TPUBS[2], KeyPrefix::Xpub).unwrap();
        assert_eq!(infer_network(&xkeys), Err(Error::MixedNetworks));
        let path = DerivationPath::new("0", false).unwrap();
        assert_eq!(
            derive_multisig(MultisigKind::P2sh, 2, &xkeys, &path, 1, KeyOrder::Sorted),
            Err(Error::MixedNetworks)
        );
    }

    #[test]
    fn parse_options() {
        assert_eq!("p2sh-p2wsh".parse::<MultisigKind>().unwrap(), MultisigKind::P2shP2wsh);
        assert_eq!("P2WSH".parse::<MultisigKind>().unwrap(), MultisigKind::P2wsh);
        assert!("p2tr".parse::<MultisigKind>().is_err());
        assert_eq!("as-provided".parse::<KeyOrder>().unwrap(), KeyOrder::AsProvided);
        assert!("random".parse::<KeyOrder>().is_err());
    }
}
