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

#[macro_use]
extern crate clap;
#[macro_use]
extern crate amplify;
extern crate serde_crate as serde;

use bitcoin::hashes::hex::{FromHex, ToHex};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use xkeys::generate::{self, MnemonicLanguage};
use xkeys::{
    Column, DeriveParams, KeyOrder, KeyPrefix, MultisigKind, MultisigRecord, Network,
    Row,
};

/// Command-line arguments
#[derive(Parser)]
#[derive(Clone, Eq, PartialEq, Debug)]
#[clap(
    author,
    version,
    name = "xkeys",
    about = "Command-line toolkit for bitcoin & litecoin extended keys"
)]
pub struct Args {
    /// Command to execute
    #[clap(subcommand)]
    pub command: Command,

    /// Output format
    #[clap(short, long, global = true, env = "XKEYS_FORMAT", value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Increase logging verbosity; overridden by `RUST_LOG`
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output rendering
#[derive(ValueEnum)]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OutputFormat {
    /// Human-readable text with a colored header
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML document
    Yaml,
}

/// Command to execute
#[derive(Subcommand)]
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Command {
    /// Convert extended key to a different SLIP-132 prefix
    Convert {
        /// Extended key to convert
        key: String,

        /// Target prefix (xpub, ypub, Zpub, tprv, ...)
        #[clap(required_unless_present = "normalize")]
        target: Option<KeyPrefix>,

        /// Convert into the normalized BIP32 form (xpub, xprv, tpub or tprv)
        #[clap(long, conflicts_with = "target")]
        normalize: bool,

        /// Allow conversion outside of the key group, changing network or key
        /// kind in the version bytes
        #[clap(long)]
        force: bool,
    },

    /// Decode WIF private key into hex
    ConvertWif {
        /// Private key in wallet import format
        wif: String,
    },

    /// Derive sequential child keys and print requested columns for each
    Derive {
        /// Root extended key
        key: String,

        /// Derivation path of the parent of enumerated children
        #[clap(short, long, default_value = "m/")]
        path: String,

        /// Comma-separated column list, or `all`
        #[clap(short, long = "cols")]
        columns: Option<String>,

        /// Number of children to derive
        #[clap(short = 'n', long, default_value = "5")]
        count: u32,

        /// Print a row for the root key before the children
        #[clap(long)]
        include_root: bool,

        /// Derive hardened children
        #[clap(long)]
        hardened: bool,

        /// Network: btc, btctest, ltc or ltctest. Defaults to the network
        /// of the key prefix.
        #[clap(short = 'N', long, env = "XKEYS_NETWORK", value_parser = Network::from_any_str)]
        network: Option<Network>,
    },

    /// Construct M-of-N multisig addresses from public keys or extended keys
    Multisig {
        /// Number of signatures required
        #[clap(short, long)]
        threshold: usize,

        /// Output type: p2sh, p2wsh or p2shp2wsh
        #[clap(long, default_value = "p2sh")]
        kind: MultisigKind,

        /// Comma-separated hex public keys
        #[clap(long, value_delimiter = ',', required_unless_present = "xkeys", conflicts_with = "xkeys")]
        pubkeys: Vec<String>,

        /// Comma-separated extended public keys of the same network
        #[clap(long, value_delimiter = ',')]
        xkeys: Vec<String>,

        /// Derivation path of the parent of enumerated children, used with
        /// `--xkeys`
        #[clap(short, long, default_value = "m/")]
        path: String,

        /// Number of addresses to derive, used with `--xkeys`
        #[clap(short = 'n', long, default_value = "1")]
        count: u32,

        /// Public key order inside the script: sorted or as-provided
        #[clap(long, default_value = "sorted")]
        order: KeyOrder,

        /// Network for public keys: btc, btctest, ltc, ltctest, mainnet or
        /// testnet
        #[clap(short = 'N', long, env = "XKEYS_NETWORK", value_parser = Network::from_any_str, default_value = "btc")]
        network: Network,
    },

    /// Check validity of an extended key, public key or private key
    Validate {
        /// Extended key of any SLIP-132 prefix
        #[clap(required_unless_present_any = ["pubkey", "privkey"])]
        key: Option<String>,

        /// Hex-encoded public key
        #[clap(long, conflicts_with_all = ["key", "privkey"])]
        pubkey: Option<String>,

        /// Hex-encoded 32-byte private key
        #[clap(long, conflicts_with_all = ["key", "pubkey"])]
        privkey: Option<String>,

        /// Network the extended key must belong to. Defaults to the network
        /// of the key prefix.
        #[clap(short = 'N', long, env = "XKEYS_NETWORK", value_parser = Network::from_any_str)]
        network: Option<Network>,
    },

    /// Generate fresh key material
    Generate {
        /// What to generate
        #[clap(subcommand)]
        what: Generate,
    },
}

/// Key material to generate
#[derive(Subcommand)]
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Generate {
    /// BIP39 mnemonic
    Mnemonic {
        /// Word list language: en, es, fr, it, jp or ko
        #[clap(short, long, default_value = "en")]
        lang: MnemonicLanguage,

        /// Number of words: 12, 15, 18, 21 or 24
        #[clap(short, long, default_value = "12")]
        words: usize,
    },

    /// Random 64-byte seed
    Seed,

    /// Master extended key from a random seed
    Xkey {
        /// Prefix of the key (xprv, zpub, tprv, ...)
        prefix: KeyPrefix,
    },

    /// Random private key with its WIF and public key
    Keypair {
        /// Network for the WIF encoding
        #[clap(short = 'N', long, value_parser = Network::from_any_str, default_value = "btc")]
        network: Network,
    },
}

#[derive(Debug, Display, Error, From)]
#[display(inner)]
pub enum Error {
    #[from]
    Xkeys(xkeys::Error),

    #[from]
    Slip132(slip132::Error),

    #[from]
    Json(serde_json::Error),

    #[from]
    Yaml(serde_yaml::Error),
}

impl OutputFormat {
    fn print<T: Serialize>(self, value: &T, table: impl FnOnce(&T)) -> Result<(), Error> {
        match self {
            OutputFormat::Table => table(value),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        }
        Ok(())
    }

    fn print_str(self, value: &str) -> Result<(), Error> {
        self.print(&value, |value| println!("{}", value))
    }
}

impl Args {
    fn init_logging(&self) {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn exec(&self) -> Result<(), Error> {
        match &self.command {
            Command::Convert {
                key,
                target,
                normalize,
                force,
            } => self.convert(key, *target, *normalize, *force),
            Command::ConvertWif { wif } => {
                self.format.print_str(&xkeys::wif_to_private_key(wif)?.to_hex())
            }
            Command::Derive {
                key,
                path,
                columns,
                count,
                include_root,
                hardened,
                network,
            } => {
                let network = match network {
                    Some(network) => *network,
                    None => Network::with_prefix(KeyPrefix::from_xkey_str(key)?),
                };
                let mut params = DeriveParams::new(network).with_path(path).with_count(*count);
                if let Some(columns) = columns {
                    params = params.with_columns(columns)?;
                }
                params.include_root = *include_root;
                params.hardened_children = *hardened;
                let rows = xkeys::derive(key, &params)?;
                self.format.print(&rows, |rows| print_rows(&params.columns, rows))
            }
            Command::Multisig {
                threshold,
                kind,
                pubkeys,
                xkeys: xpubs,
                path,
                count,
                order,
                network,
            } => {
                let records = if xpubs.is_empty() {
                    let keys = xkeys::parse_public_keys(pubkeys.as_slice())?;
                    vec![xkeys::build_multisig(*kind, *threshold, &keys, *order, *network)?]
                } else {
                    let path = xkeys::DerivationPath::new(path, false)
                        .map_err(xkeys::Error::from)?;
                    xkeys::derive_multisig(*kind, *threshold, xpubs, &path, *count, *order)?
                };
                self.format.print(&records, |records| print_multisig(records))
            }
            Command::Validate {
                key,
                pubkey,
                privkey,
                network,
            } => {
                let valid = match (key, pubkey, privkey) {
                    (Some(key), ..) => match network {
                        Some(network) => xkeys::is_valid_ext_key(key, *network),
                        None => KeyPrefix::from_xkey_str(key)
                            .map(|prefix| xkeys::is_valid_ext_key(key, Network::with_prefix(prefix)))
                            .unwrap_or_default(),
                    },
                    (_, Some(hex), _) => Vec::<u8>::from_hex(hex.trim())
                        .map(|data| xkeys::is_valid_public_key(&data))
                        .unwrap_or_default(),
                    (.., Some(hex)) => Vec::<u8>::from_hex(hex.trim())
                        .map(|data| xkeys::is_valid_private_key(&data))
                        .unwrap_or_default(),
                    (None, None, None) => false,
                };
                self.format.print(&valid, |valid| {
                    if *valid {
                        println!("{}", "valid".bright_green())
                    } else {
                        println!("{}", "invalid".bright_red())
                    }
                })
            }
            Command::Generate { what } => self.generate(what),
        }
    }

    fn convert(
        &self,
        key: &str,
        target: Option<KeyPrefix>,
        normalize: bool,
        force: bool,
    ) -> Result<(), Error> {
        let converted = match target {
            _ if normalize => slip132::normalize(key)?,
            Some(target) if force => slip132::convert(key, target)?,
            Some(target) => slip132::convert_checked(key, target)?,
            None => slip132::normalize(key)?,
        };
        self.format.print_str(&converted)
    }

    fn generate(&self, what: &Generate) -> Result<(), Error> {
        match what {
            Generate::Mnemonic { lang, words } => {
                self.format.print_str(&generate::generate_mnemonic(*lang, *words)?)
            }
            Generate::Seed => self.format.print_str(&generate::generate_seed()?),
            Generate::Xkey { prefix } => {
                self.format.print_str(&generate::generate_ext_key(*prefix)?)
            }
            Generate::Keypair { network } => {
                let pair = generate::generate_key_pair(*network);
                self.format.print(&pair, |pair| {
                    println!("{:>12} {}", "wif:".bright_white(), pair.wif);
                    println!("{:>12} {}", "private key:".bright_white(), pair.private_key);
                    println!("{:>12} {}", "public key:".bright_white(), pair.public_key);
                })
            }
        }
    }
}

fn print_rows(columns: &[Column], rows: &[Row]) {
    let header = columns.iter().map(Column::to_string).collect::<Vec<_>>().join("\t");
    println!("{}", header.bright_white().bold());
    for row in rows {
        let line = row.cells().map(ToString::to_string).collect::<Vec<_>>().join("\t");
        println!("{}", line);
    }
}

fn print_multisig(records: &[MultisigRecord]) {
    for record in records {
        if let Some(path) = &record.path {
            println!("{}", path.bright_yellow());
        }
        println!("{:>14} {}", "type:".bright_white(), record.descriptor);
        println!("{:>14} {}", "address:".bright_white(), record.address.bright_green());
        for key in &record.public_keys {
            println!("{:>14} {}", "public key:".bright_white(), key);
        }
        println!("{:>14} {}", "scriptPubKey:".bright_white(), record.script_pub_key);
        println!("{:>14} {}", "redeem:".bright_white(), record.redeem);
        println!("{:>14} {}", "redeem ASM:".bright_white(), record.redeem_asm);
        println!();
    }
}

fn main() {
    let args = Args::parse();
    args.init_logging();
    if let Err(err) = args.exec() {
        eprintln!("{}: {}\n", "Error".bright_red(), err);
        std::process::exit(1);
    }
}
