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

use core::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bitcoin::hashes::hex::ToHex;

use crate::{address, Error, NetworkParams, Node};

/// Output column of a derived row
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum Column {
    /// Derivation path label
    #[display("path")]
    Path,

    /// Node depth
    #[display("depth")]
    Depth,

    /// Legacy P2PKH address
    #[display("p2pkh")]
    P2pkh,

    /// P2WPKH nested in P2SH address
    #[display("p2sh_p2wpkh")]
    P2shP2wpkh,

    /// Native segwit P2WPKH address
    #[display("p2wpkh")]
    P2wpkh,

    /// Extended private key
    #[display("xprv")]
    Xprv,

    /// Extended public key
    #[display("xpub")]
    Xpub,

    /// Private key hex
    #[display("privkey")]
    Privkey,

    /// Compressed public key hex
    #[display("pubkey")]
    Pubkey,

    /// Public key hash160 hex
    #[display("pubkey_hash")]
    PubkeyHash,

    /// Private key in wallet import format
    #[display("wif")]
    Wif,

    /// Node fingerprint hex
    #[display("fingerprint")]
    Fingerprint,

    /// Same as [`Column::P2pkh`], under its own name
    #[display("legacy")]
    Legacy,

    /// Same as [`Column::P2wpkh`], under its own name
    #[display("bech32")]
    Bech32,
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|column| column.to_string() == s.trim())
            .ok_or_else(|| Error::UnknownColumn(s.trim().to_owned()))
    }
}

impl Column {
    /// Every column, synonyms last
    pub const ALL: [Column; 14] = [
        Column::Path,
        Column::Depth,
        Column::P2pkh,
        Column::P2shP2wpkh,
        Column::P2wpkh,
        Column::Xprv,
        Column::Xpub,
        Column::Privkey,
        Column::Pubkey,
        Column::PubkeyHash,
        Column::Wif,
        Column::Fingerprint,
        Column::Legacy,
        Column::Bech32,
    ];

    /// Columns produced when none are requested
    pub const DEFAULT: [Column; 7] = [
        Column::Path,
        Column::Depth,
        Column::P2pkh,
        Column::P2shP2wpkh,
        Column::P2wpkh,
        Column::Wif,
        Column::Pubkey,
    ];

    /// Parses comma-separated column list. `all` selects every column;
    /// repeated names are kept once, at their first position.
    pub fn parse_list(s: &str) -> Result<Vec<Column>, Error> {
        let mut columns = Vec::new();
        for name in s.split(',') {
            let selected = match name.trim() {
                "all" => Column::ALL.to_vec(),
                _ => vec![name.parse()?],
            };
            for column in selected {
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
        }
        Ok(columns)
    }

    /// Whether the column needs the private key; such columns are null for
    /// neutered nodes
    pub fn is_secret(self) -> bool { matches!(self, Column::Xprv | Column::Privkey | Column::Wif) }

    /// Computes column value for a node
    pub fn evaluate(self, node: &Node, label: &str, params: &NetworkParams) -> Result<Cell, Error> {
        Ok(match self {
            Column::Path => Cell::Text(label.to_owned()),
            Column::Depth => Cell::Number(node.depth() as u32),
            Column::P2pkh | Column::Legacy => Cell::Text(address::p2pkh(node, params)),
            Column::P2shP2wpkh => Cell::Text(address::p2sh_p2wpkh(node, params)),
            Column::P2wpkh | Column::Bech32 => Cell::Text(address::p2wpkh(node, params)?),
            Column::Xprv if node.is_neutered() => Cell::Null,
            Column::Xprv => Cell::Text(node.to_base58(params)),
            Column::Xpub => Cell::Text(node.to_base58_public(params)),
            Column::Privkey => node
                .private_key()
                .map(|key| key.secret_bytes().to_hex())
                .into(),
            Column::Pubkey => Cell::Text(node.public_key().serialize().to_hex()),
            Column::PubkeyHash => Cell::Text(address::hash160(node).to_hex()),
            Column::Wif => node.to_wif(params).into(),
            Column::Fingerprint => Cell::Text(node.fingerprint().to_hex()),
        })
    }
}

/// Column value
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", untagged)
)]
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Cell {
    /// Textual value
    Text(String),
    /// Numeric value
    Number(u32),
    /// Value absent for the node
    Null,
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(number) => Display::fmt(number, f),
            Cell::Null => f.write_str("null"),
        }
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self { value.map(Cell::Text).unwrap_or(Cell::Null) }
}

impl Cell {
    /// Textual value, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Detects absent value
    pub fn is_null(&self) -> bool { *self == Cell::Null }
}

/// Derived row: cells in the order their columns were requested
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Row(Vec<(Column, Cell)>);

impl Row {
    /// Evaluates requested columns for a node
    pub fn evaluate(
        node: &Node,
        label: &str,
        columns: &[Column],
        params: &NetworkParams,
    ) -> Result<Row, Error> {
        columns
            .iter()
            .map(|column| Ok((*column, column.evaluate(node, label, params)?)))
            .collect::<Result<_, Error>>()
            .map(Row)
    }

    /// Cell of a column, if the column was requested
    pub fn get(&self, column: Column) -> Option<&Cell> {
        self.0
            .iter()
            .find(|(col, _)| *col == column)
            .map(|(_, cell)| cell)
    }

    /// Columns of the row, in order
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ { self.0.iter().map(|(col, _)| *col) }

    /// Cells of the row, in column order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> { self.0.iter().map(|(_, cell)| cell) }

    /// Number of cells
    pub fn len(&self) -> usize { self.0.len() }

    /// Detects row without columns
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, cell) in &self.0 {
            map.serialize_entry(&column.to_string(), cell)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod test {
    use secp256k1::Secp256k1;

    use super::*;
    use crate::{DerivationPath, Network};

    const TPRV: &str = "tprv8ZgxMBicQKsPd7Uf69XL1XwhmjHopUGep8GuEiJDZmbQz6o58LninorQAfcKZWARbtRtfnLcJ5MQ2AtHcQJCCRUcMRvmDUjyEmNUWwx8UbK";
    const TPUB: &str = "tpubD6NzVbkrYhZ4WaWSyoBvQwbpLkojyoTZPRsgXELWz3Popb3qkjcJyJUGLnL4qHHoQvao8ESaAstxYSnhyswJ76uZPStJRJCTKvosUCJZL5B";

    #[test]
    fn parse_columns() {
        assert_eq!(
            Column::parse_list("path, depth,p2pkh,p2sh_p2wpkh,p2wpkh,wif,pubkey").unwrap(),
            Column::DEFAULT.to_vec()
        );
        assert_eq!(Column::parse_list("all").unwrap(), Column::ALL.to_vec());
        assert_eq!(Column::parse_list("wif,path,wif").unwrap(), vec![Column::Wif, Column::Path]);
        assert_eq!(Column::parse_list("path,all").unwrap().len(), 14);
        assert_eq!(Column::parse_list("path,addr"), Err(Error::UnknownColumn(s!("addr"))));
        assert!(Column::parse_list("").is_err());
        for column in Column::ALL {
            assert_eq!(column.to_string().parse::<Column>().unwrap(), column);
        }
    }

    #[test]
    fn evaluate_private_node() {
        let secp = Secp256k1::new();
        let params = Network::BtcTest.params();
        let root = Node::from_base58(&secp, TPRV, Network::BtcTest).unwrap();
        let node = root.derive(&secp, &DerivationPath::new("0", false).unwrap()).unwrap();
        let row = Row::evaluate(&node, "m/0/0", &Column::ALL, params).unwrap();

        let text = |column| row.get(column).and_then(Cell::as_str).unwrap().to_owned();
        assert_eq!(text(Column::Path), "m/0/0");
        assert_eq!(row.get(Column::Depth), Some(&Cell::Number(2)));
        assert_eq!(text(Column::P2pkh), "n1LKejAadN6hg2FrBXoU1KrwX4uK16mco9");
        assert_eq!(text(Column::Legacy), text(Column::P2pkh));
        assert_eq!(text(Column::P2shP2wpkh), "2N2gQKzjUe47gM8p1JZxaAkTcoHPXV6YyVp");
        assert_eq!(text(Column::P2wpkh), "tb1qm90ugl4d48jv8n6e5t9ln6t9zlpm5th690vysp");
        assert_eq!(text(Column::Bech32), text(Column::P2wpkh));
        assert_eq!(
            text(Column::Privkey),
            "b6f762e107af1dd4c73f7f1ce84298d71ec07a0a66fb8d8f24551f99435af082"
        );
        assert_eq!(
            text(Column::Pubkey),
            "02c97dc3f4420402e01a113984311bf4a1b8de376cac0bdcfaf1b3ac81f13433c7"
        );
        assert_eq!(text(Column::PubkeyHash), "d95fc47eada9e4c3cf59a2cbf9e96517c3ba2efa");
        assert_eq!(text(Column::Fingerprint), "d95fc47e");
        assert_eq!(text(Column::Wif), "cTiN5q13XR9ebmqfXbaCbz2x6C6inEJWqoJ5jP4CCw98ZCJ4gkuN");
        assert!(text(Column::Xprv).starts_with("tprv8etcjmQgEyf5"));
        assert!(text(Column::Xpub).starts_with("tpubDBaetBSvPMLk"));
        assert_eq!(row.columns().collect::<Vec<_>>(), Column::ALL.to_vec());
    }

    #[test]
    fn evaluate_neutered_node() {
        let secp = Secp256k1::new();
        let params = Network::BtcTest.params();
        let path = DerivationPath::new("0", false).unwrap();
        let private = Node::from_base58(&secp, TPRV, Network::BtcTest)
            .unwrap()
            .derive(&secp, &path)
            .unwrap();
        let public = Node::from_base58(&secp, TPUB, Network::BtcTest)
            .unwrap()
            .derive(&secp, &path)
            .unwrap();
        let private_row = Row::evaluate(&private, "m/0/0", &Column::ALL, params).unwrap();
        let public_row = Row::evaluate(&public, "m/0/0", &Column::ALL, params).unwrap();
        for column in Column::ALL {
            if column.is_secret() {
                assert!(public_row.get(column).unwrap().is_null());
                assert!(!private_row.get(column).unwrap().is_null());
            } else {
                assert_eq!(public_row.get(column), private_row.get(column));
            }
        }
    }
}
