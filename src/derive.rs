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

use secp256k1::Secp256k1;
use slip132::KeyPrefix;

use crate::{Column, DerivationPath, Error, Network, Node, Row};

/// Label of the row produced for the root node itself
pub const ROOT_LABEL: &str = "m/";

/// Parameters of a derivation run
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DeriveParams {
    /// Path to the parent of the enumerated children
    pub path: String,
    /// Requested columns, in output order
    pub columns: Vec<Column>,
    /// Emit a row for the root key before the children
    pub include_root: bool,
    /// Number of sequential children to derive
    pub count: u32,
    /// Enumerate hardened children
    pub hardened_children: bool,
    /// Network for key versions and address encodings
    pub network: Network,
}

impl DeriveParams {
    /// Default parameters: five non-hardened children of `m/` with the
    /// default column set
    pub fn new(network: Network) -> DeriveParams {
        DeriveParams {
            path: s!("m/"),
            columns: Column::DEFAULT.to_vec(),
            include_root: false,
            count: 5,
            hardened_children: false,
            network,
        }
    }

    /// Replaces columns from a comma-separated list or `all`
    pub fn with_columns(mut self, columns: &str) -> Result<DeriveParams, Error> {
        self.columns = Column::parse_list(columns)?;
        Ok(self)
    }

    /// Replaces derivation path
    pub fn with_path(mut self, path: impl ToString) -> DeriveParams {
        self.path = path.to_string();
        self
    }

    /// Replaces number of children
    pub fn with_count(mut self, count: u32) -> DeriveParams {
        self.count = count;
        self
    }
}

/// Derives `count` sequential children of `xkey` along the configured path.
///
/// Every child is derived from the root along its full path. Rows come in
/// path order, preceded by the root row when requested.
pub fn derive(xkey: &str, params: &DeriveParams) -> Result<Vec<Row>, Error> {
    let prefix = KeyPrefix::from_xkey_str(xkey)?;
    let network_params = params.network.params();
    let secp = Secp256k1::new();
    let root = Node::from_base58(&secp, xkey, params.network)?;
    let mut path = DerivationPath::new(&params.path, params.hardened_children)?;

    debug!(
        %prefix,
        network = %params.network,
        path = %path,
        count = params.count,
        "deriving child keys"
    );

    let mut rows = Vec::new();
    if params.include_root {
        rows.push(Row::evaluate(&root, ROOT_LABEL, &params.columns, network_params)?);
    }
    for no in 0..params.count {
        if no > 0 {
            path = path.with_incremented_last(1)?;
        }
        let node = root.derive(&secp, &path)?;
        let label = format!("m/{}", path);
        trace!(path = %label, "derived child");
        rows.push(Row::evaluate(&node, &label, &params.columns, network_params)?);
    }
    Ok(rows)
}
