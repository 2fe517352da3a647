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

use bitcoin::util::bip32::{self, ChildNumber};

/// Index value from which hardened derivation starts
pub const HARDENED_INDEX_BOUNDARY: u32 = 1 << 31;

/// Errors parsing and walking derivation paths
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum PathError {
    /// invalid derivation path component `{0}`: it must be a non-negative
    /// integer, optionally followed by `'` or `h` for hardened derivation
    InvalidPathComponent(String),

    /// incrementing derivation index {0} by {1} leaves the range of its
    /// normal or hardened half
    IndexOverflow(u32, u32),

    /// derivation path has a single component and can't go one level up
    NoParent,
}

/// Derivation path with the enumeration cursor as its last component.
///
/// Keeps both the components as they were written and their numeric form, in
/// which hardened components have [`HARDENED_INDEX_BOUNDARY`] added. The value
/// is immutable: stepping the cursor returns a new path.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DerivationPath {
    original: Vec<String>,
    base: Vec<u32>,
    normalized: Vec<u32>,
}

impl Display for DerivationPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in &self.normalized {
            if !first {
                f.write_str("/")?;
            }
            first = false;
            if *index >= HARDENED_INDEX_BOUNDARY {
                write!(f, "{}'", index - HARDENED_INDEX_BOUNDARY)?;
            } else {
                write!(f, "{}", index)?;
            }
        }
        Ok(())
    }
}

/// Parses single path component into its numeric form
pub fn parse_component(component: &str) -> Result<u32, PathError> {
    let err = || PathError::InvalidPathComponent(component.to_owned());
    let (digits, hardened) = match component.strip_suffix(|c: char| c == '\'' || c == 'h') {
        Some(digits) => (digits, true),
        None => (component, false),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    let index = digits.parse::<u32>().map_err(|_| err())?;
    if !hardened {
        return Ok(index);
    }
    if index >= HARDENED_INDEX_BOUNDARY {
        return Err(err());
    }
    Ok(index + HARDENED_INDEX_BOUNDARY)
}

impl DerivationPath {
    /// Builds the path from user input, appending the cursor component (`0`,
    /// or `0'` when `hardened_children` is set).
    ///
    /// Input is tolerant to a leading `m` and/or `/` and to a single trailing
    /// `/`, so `""`, `"m"`, `"m/"` and `"/"` all produce the path `0`.
    pub fn new(path: &str, hardened_children: bool) -> Result<DerivationPath, PathError> {
        let path = path.trim();
        let path = path.strip_suffix('/').unwrap_or(path);
        let path = path.strip_prefix('m').unwrap_or(path);
        let path = path.strip_prefix('/').unwrap_or(path);

        let cursor = if hardened_children { "0'" } else { "0" };
        let original = if path.is_empty() {
            vec![cursor.to_owned()]
        } else {
            path.split('/')
                .map(str::to_owned)
                .chain(Some(cursor.to_owned()))
                .collect()
        };
        DerivationPath::with_components(original)
    }

    /// Builds the path from explicit components; the last one becomes the
    /// enumeration cursor.
    pub fn with_components(original: Vec<String>) -> Result<DerivationPath, PathError> {
        if original.is_empty() {
            return Err(PathError::InvalidPathComponent(s!("")));
        }
        let base = original
            .iter()
            .map(String::as_str)
            .map(parse_component)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DerivationPath {
            original,
            normalized: base.clone(),
            base,
        })
    }

    /// Components in the form they were provided
    pub fn original(&self) -> &[String] { &self.original }

    /// Numeric components, hardened ones shifted by
    /// [`HARDENED_INDEX_BOUNDARY`]
    pub fn normalized(&self) -> &[u32] { &self.normalized }

    /// Numeric components as a `/`-separated string without hardened markers
    pub fn normalized_to_string(&self) -> String {
        self.normalized
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Number of components
    #[inline]
    pub fn len(&self) -> usize { self.normalized.len() }

    /// Always `false`: a path holds at least the cursor component
    #[inline]
    pub fn is_empty(&self) -> bool { self.normalized.is_empty() }

    /// Current value of the enumeration cursor
    pub fn last(&self) -> u32 { self.normalized.last().copied().unwrap_or_default() }

    /// Path with the last component advanced by `n`. Fails if the cursor
    /// would cross [`HARDENED_INDEX_BOUNDARY`] or overflow `u32`.
    pub fn with_incremented_last(&self, n: u32) -> Result<DerivationPath, PathError> {
        let last = self.last();
        let limit = if last >= HARDENED_INDEX_BOUNDARY {
            u32::MAX
        } else {
            HARDENED_INDEX_BOUNDARY - 1
        };
        let next = last
            .checked_add(n)
            .filter(|next| *next <= limit)
            .ok_or(PathError::IndexOverflow(last, n))?;
        let mut path = self.clone();
        if let Some(cursor) = path.normalized.last_mut() {
            *cursor = next;
        }
        Ok(path)
    }

    /// Path with all increments undone
    pub fn reset(&self) -> DerivationPath {
        DerivationPath {
            original: self.original.clone(),
            base: self.base.clone(),
            normalized: self.base.clone(),
        }
    }

    /// Path without the last component; the one before becomes the cursor
    pub fn parent(&self) -> Result<DerivationPath, PathError> {
        if self.len() < 2 {
            return Err(PathError::NoParent);
        }
        let mut path = self.clone();
        path.original.pop();
        path.base.pop();
        path.normalized.pop();
        Ok(path)
    }

    /// Path extended with one more component, which becomes the cursor
    pub fn child(&self, component: &str) -> Result<DerivationPath, PathError> {
        let index = parse_component(component)?;
        let mut path = self.clone();
        path.original.push(component.to_owned());
        path.base.push(index);
        path.normalized.push(index);
        Ok(path)
    }

    /// Child numbers to feed into BIP32 derivation
    pub fn child_numbers(&self) -> Vec<ChildNumber> {
        self.normalized.iter().copied().map(ChildNumber::from).collect()
    }
}

impl From<&DerivationPath> for bip32::DerivationPath {
    fn from(path: &DerivationPath) -> Self { bip32::DerivationPath::from(path.child_numbers()) }
}
