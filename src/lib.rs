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

//! Extended key toolkit for bitcoin & litecoin HD wallets: SLIP-132 prefix
//! conversion, WIF decoding, tabular child key derivation and multisig
//! address construction.

// Coding conventions
#![recursion_limit = "256"]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate tracing;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

pub extern crate slip132;

pub mod address;
pub mod column;
pub mod derive;
mod error;
#[cfg(feature = "keygen")]
pub mod generate;
pub mod keys;
pub mod multisig;
pub mod network;
pub mod node;
pub mod path;

pub use column::{Cell, Column, Row};
pub use derive::{derive, DeriveParams, ROOT_LABEL};
pub use error::Error;
pub use keys::{
    is_valid_ext_key, is_valid_private_key, is_valid_public_key, private_key_to_wif,
    wif_to_private_key,
};
pub use multisig::{
    build_multisig, derive_multisig, infer_network, parse_public_keys, KeyOrder, MultisigKind,
    MultisigRecord,
};
pub use network::{LegacyNetwork, Network, NetworkParams};
pub use node::Node;
pub use path::{DerivationPath, PathError, HARDENED_INDEX_BOUNDARY};
pub use slip132::{convert, convert_checked, normalize, KeyPrefix};
