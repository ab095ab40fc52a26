//! The operation codec: forging structured operations into the node's
//! binary wire form and back.
//!
//! The wire form is lowercase hex. A forged group is the 32-byte branch
//! payload followed by one encoded operation per `Contents`, each introduced
//! by a one-byte kind tag:
//!
//! | kind        | tag  |
//! |-------------|------|
//! | reveal      | `6b` |
//! | transaction | `6c` |
//! | origination | `6d` |
//! | delegation  | `6e` |
//!
//! Every operation body starts with the common source block (a `00`
//! selector, the 20-byte tz1 payload, then fee, counter, gas limit, and
//! storage limit as Zarith) followed by the kind-specific suffix. A signed
//! group carries a 64-byte signature at the very end.
//!
//! Forging validates each `Contents` first (see [`validate`]) and is
//! byte-exact against what the node's own forge endpoint produces for the
//! supported shapes; unforging consumes the stream strictly left to right
//! and fails terminally on the first malformed field.

pub mod validate;

use thiserror::Error;

use crate::codec::base58::{self, BRANCH, EDPK, KT1, TZ1};
use crate::codec::binary::{self, BinaryError};
use crate::codec::zarith::{self, ZarithError};
use crate::codec::Base58CheckError;
use crate::model::{
    BigInt, Contents, Delegation, OperationHeader, OperationKind, Origination, Reveal, Transaction,
};
use validate::ValidationError;

/// Hex length of the branch payload at the head of a forged group.
const BRANCH_HEX_LEN: usize = 64;
/// Hex length of the trailing signature on a signed group.
const SIGNATURE_HEX_LEN: usize = 128;
/// Hex length of a `00`-selector tz1 address (source, delegate).
const TZ_ADDRESS_HEX_LEN: usize = 42;
/// Hex length of a transfer destination, either shape.
const DESTINATION_HEX_LEN: usize = 44;
/// Hex length of a tagged ed25519 public key.
const PUBLIC_KEY_HEX_LEN: usize = 66;

/// The default contract script every origination carries: a 4-byte length,
/// the 198-byte manager-contract code, and the 26-byte default storage.
/// Part of the wire grammar; emitted byte-exact and never regenerated.
const ORIGINATION_SCRIPT: &str = "000000c602000000c105000764085e036c055f036d0000000325646f046c000000082564656661756c740501035d050202000000950200000012020000000d03210316051f02000000020317072e020000006a0743036a00000313020000001e020000000403190325072c020000000002000000090200000004034f0327020000000b051f02000000020321034c031e03540348020000001e020000000403190325072c020000000002000000090200000004034f0327034f0326034202000000080320053d036d03420000001a0a000000150008ba0cb2fad622697145cf1665124096d25bc31e";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from forging or unforging operations.
///
/// Wire-shape failures keep enough context to say which layer broke: the
/// branch, which address role, which field the input ran out under.
#[derive(Debug, PartialEq, Error)]
pub enum ForgeError {
    /// The branch failed base58-check or prefix validation.
    #[error("failed to parse branch {branch:?}")]
    BadBranch {
        branch: String,
        #[source]
        source: Base58CheckError,
    },
    /// An address failed base58-check or prefix validation.
    #[error("invalid {role} address {address:?}")]
    BadAddress {
        role: &'static str,
        address: String,
        #[source]
        source: Base58CheckError,
    },
    /// A public key failed base58-check or prefix validation.
    #[error("invalid public key {key:?}")]
    BadPublicKey {
        key: String,
        #[source]
        source: Base58CheckError,
    },
    /// The operation failed validation before encoding.
    #[error("{kind} failed validation")]
    Validation {
        kind: OperationKind,
        source: ValidationError,
    },
    #[error(transparent)]
    Zarith(#[from] ZarithError),
    #[error(transparent)]
    Boolean(#[from] BinaryError),
    /// An address on the wire used a shape this codec does not speak.
    #[error("address format not supported: {found:?}")]
    UnsupportedAddress { found: String },
    /// A public key on the wire used a curve tag this codec does not speak.
    #[error("public key format not supported: {found:?}")]
    UnsupportedPublicKey { found: String },
    /// An operation tag byte outside the four supported kinds.
    #[error("unsupported operation tag {tag:?}")]
    UnsupportedKind { tag: String },
    /// The transaction carries Michelson parameters, which this codec does
    /// not support.
    #[error("transaction parameters are not supported")]
    UnsupportedParameters,
    /// The delegate-present boolean was false; withdrawals and undelegated
    /// originations are not supported.
    #[error("absent delegate is not supported")]
    AbsentDelegate,
    /// The input ended before a fixed-length field was complete.
    #[error("input ended before {expected} was complete")]
    Truncated { expected: &'static str },
}

// ---------------------------------------------------------------------------
// Forging
// ---------------------------------------------------------------------------

/// Forges a group of operations committed to `branch` into lowercase hex.
///
/// Every `Contents` is validated before encoding; the first invalid one
/// aborts the forge with its aggregated [`ValidationError`].
///
/// # Examples
///
/// ```
/// use mxp_client::forge::forge_operation;
/// use mxp_client::{Contents, OperationHeader, Transaction};
///
/// let source = "tz1LSAycAVcNdYnXCy18bwVksXci8gUC2YpA";
/// let contents = Contents::Transaction(Transaction {
///     header: OperationHeader::new(source, 10100, 10, 10100, 0),
///     amount: Some(30.into()),
///     destination: Some(source.into()),
///     metadata: None,
/// });
/// let forged = forge_operation(
///     "BLyvCRkxuTXkx1KeGvrcEXiPYj4p1tFxzvFDhoHE7SFKtmP1rbk",
///     &[contents],
/// )
/// .unwrap();
/// assert!(forged.starts_with("a732d352"));
/// ```
pub fn forge_operation(branch: &str, contents: &[Contents]) -> Result<String, ForgeError> {
    let mut out = base58::strip_prefix(branch, &BRANCH).map_err(|source| ForgeError::BadBranch {
        branch: branch.to_string(),
        source,
    })?;
    for item in contents {
        out.push_str(&forge_contents(item)?);
    }
    Ok(out)
}

/// Validates and encodes a single `Contents` without the branch frame.
fn forge_contents(contents: &Contents) -> Result<String, ForgeError> {
    let kind = contents.kind();
    validate::validate(contents).map_err(|source| ForgeError::Validation { kind, source })?;

    let mut out = format!("{:02x}", kind.tag());
    out.push_str(&forge_common(contents.header(), kind)?);
    match contents {
        Contents::Transaction(tx) => {
            out.push_str(&zarith::encode(require(&tx.amount, "amount", kind)?));
            out.push_str(&forge_destination(require(&tx.destination, "destination", kind)?)?);
            // Parameters-present boolean; this encoder never emits parameters.
            out.push_str("00");
        }
        Contents::Reveal(reveal) => {
            let phk = require(&reveal.phk, "phk", kind)?;
            let payload =
                base58::strip_prefix(phk, &EDPK).map_err(|source| ForgeError::BadPublicKey {
                    key: phk.clone(),
                    source,
                })?;
            out.push_str("00");
            out.push_str(&payload);
        }
        Contents::Origination(origination) => {
            out.push_str(&zarith::encode(require(&origination.balance, "balance", kind)?));
            out.push_str("ff");
            out.push_str(&forge_tz_address(
                require(&origination.delegate, "delegate", kind)?,
                "delegate",
            )?);
            out.push_str(ORIGINATION_SCRIPT);
        }
        Contents::Delegation(delegation) => {
            out.push_str("ff");
            out.push_str(&forge_tz_address(
                require(&delegation.delegate, "delegate", kind)?,
                "delegate",
            )?);
        }
    }
    Ok(out)
}

/// Encodes the common source block: selector, source payload, and the four
/// Zarith header integers.
fn forge_common(header: &OperationHeader, kind: OperationKind) -> Result<String, ForgeError> {
    let mut out = forge_tz_address(require(&header.source, "source", kind)?, "source")?;
    out.push_str(&zarith::encode(require(&header.fee, "fee", kind)?));
    out.push_str(&zarith::encode(require(&header.counter, "counter", kind)?));
    out.push_str(&zarith::encode(require(&header.gas_limit, "gas limit", kind)?));
    out.push_str(&zarith::encode(require(&header.storage_limit, "storage limit", kind)?));
    Ok(out)
}

/// Encodes a tz1 address as its `00`-selector wire form.
fn forge_tz_address(address: &str, role: &'static str) -> Result<String, ForgeError> {
    let payload = base58::strip_prefix(address, &TZ1).map_err(|source| ForgeError::BadAddress {
        role,
        address: address.to_string(),
        source,
    })?;
    Ok(format!("00{}", payload))
}

/// Encodes a transfer destination: `00 00 <20>` for tz1, `01 <20> 00` for KT1.
fn forge_destination(address: &str) -> Result<String, ForgeError> {
    if address.starts_with(TZ1.human) {
        Ok(format!("00{}", forge_tz_address(address, "destination")?))
    } else if address.starts_with(KT1.human) {
        let payload =
            base58::strip_prefix(address, &KT1).map_err(|source| ForgeError::BadAddress {
                role: "destination",
                address: address.to_string(),
                source,
            })?;
        Ok(format!("01{}00", payload))
    } else {
        Err(ForgeError::UnsupportedAddress {
            found: address.to_string(),
        })
    }
}

/// Fetches a field the validator has already established is present.
///
/// Encoders run only after validation; if one is somehow reached with the
/// field absent, the failure surfaces as the validator's `missing X` error
/// rather than a panic.
fn require<'a, T>(
    value: &'a Option<T>,
    name: &'static str,
    kind: OperationKind,
) -> Result<&'a T, ForgeError> {
    value.as_ref().ok_or_else(|| ForgeError::Validation {
        kind,
        source: ValidationError::single(validate::Problem::Missing(name)),
    })
}

// ---------------------------------------------------------------------------
// Unforging
// ---------------------------------------------------------------------------

/// Decodes a forged group back into its branch and `Contents` list.
///
/// When `signed` is set, the trailing 64-byte signature is dropped before
/// parsing. Decoding consumes the input strictly left to right: a tag byte
/// selects the kind, the kind's decoder consumes exactly its fields, and the
/// loop repeats until the input is exhausted. Any malformed field is a
/// terminal failure.
pub fn unforge_operation(forged: &str, signed: bool) -> Result<(String, Vec<Contents>), ForgeError> {
    let (branch, mut rest) = strip_branch(forged, signed)?;

    let mut contents = Vec::new();
    while !rest.is_empty() {
        let (tag_hex, body) = binary::split_rest(rest, 2);
        let kind = u8::from_str_radix(tag_hex, 16)
            .ok()
            .and_then(OperationKind::from_tag)
            .ok_or_else(|| ForgeError::UnsupportedKind {
                tag: tag_hex.to_string(),
            })?;
        let (item, remainder) = match kind {
            OperationKind::Transaction => unforge_transaction(body)?,
            OperationKind::Reveal => unforge_reveal(body)?,
            OperationKind::Origination => unforge_origination(body)?,
            OperationKind::Delegation => unforge_delegation(body)?,
        };
        contents.push(item);
        rest = remainder;
    }
    Ok((branch, contents))
}

/// Splits the branch off a forged group, returning the textual branch and
/// the remaining operation hex.
pub fn strip_branch(forged: &str, signed: bool) -> Result<(String, &str), ForgeError> {
    let unsigned = if signed {
        forged
            .len()
            .checked_sub(SIGNATURE_HEX_LEN)
            .and_then(|cut| forged.get(..cut))
            .ok_or(ForgeError::Truncated {
                expected: "signature",
            })?
    } else {
        forged
    };

    let (branch_hex, rest) = split_exact(unsigned, BRANCH_HEX_LEN, "branch")?;
    let branch = base58::encode(branch_hex, &BRANCH).map_err(|source| ForgeError::BadBranch {
        branch: branch_hex.to_string(),
        source,
    })?;
    Ok((branch, rest))
}

fn unforge_transaction(hex_str: &str) -> Result<(Contents, &str), ForgeError> {
    let (header, rest) = unforge_common(hex_str)?;
    let (amount, rest) = take_zarith(rest)?;
    let (destination_hex, rest) = split_exact(rest, DESTINATION_HEX_LEN, "destination")?;
    let destination = parse_address(destination_hex)?;
    let (flag_hex, rest) = split_exact(rest, 2, "parameters flag")?;
    if binary::parse_boolean(flag_hex)? {
        return Err(ForgeError::UnsupportedParameters);
    }
    let contents = Contents::Transaction(Transaction {
        header,
        amount: Some(amount),
        destination: Some(destination),
        metadata: None,
    });
    Ok((contents, rest))
}

fn unforge_reveal(hex_str: &str) -> Result<(Contents, &str), ForgeError> {
    let (header, rest) = unforge_common(hex_str)?;
    let (key_hex, rest) = split_exact(rest, PUBLIC_KEY_HEX_LEN, "public key")?;
    let phk = parse_public_key(key_hex)?;
    let contents = Contents::Reveal(Reveal {
        header,
        phk: Some(phk),
        metadata: None,
    });
    Ok((contents, rest))
}

fn unforge_origination(hex_str: &str) -> Result<(Contents, &str), ForgeError> {
    let (header, rest) = unforge_common(hex_str)?;
    let (balance, rest) = take_zarith(rest)?;
    let (flag_hex, rest) = split_exact(rest, 2, "delegate flag")?;
    if !binary::parse_boolean(flag_hex)? {
        return Err(ForgeError::AbsentDelegate);
    }
    let (delegate_hex, rest) = split_exact(rest, TZ_ADDRESS_HEX_LEN, "delegate")?;
    let delegate = parse_tz_address(delegate_hex)?;
    // The fixed script blob carries no caller data; skip it unread.
    let (_script, rest) = split_exact(rest, ORIGINATION_SCRIPT.len(), "script")?;
    let contents = Contents::Origination(Origination {
        header,
        balance: Some(balance),
        delegate: Some(delegate),
        metadata: None,
    });
    Ok((contents, rest))
}

fn unforge_delegation(hex_str: &str) -> Result<(Contents, &str), ForgeError> {
    let (header, rest) = unforge_common(hex_str)?;
    let (flag_hex, rest) = split_exact(rest, 2, "delegate flag")?;
    if !binary::parse_boolean(flag_hex)? {
        return Err(ForgeError::AbsentDelegate);
    }
    let (delegate_hex, rest) = split_exact(rest, TZ_ADDRESS_HEX_LEN, "delegate")?;
    let delegate = parse_tz_address(delegate_hex)?;
    let contents = Contents::Delegation(Delegation {
        header,
        delegate: Some(delegate),
        metadata: None,
    });
    Ok((contents, rest))
}

/// Decodes the common source block shared by all four kinds.
fn unforge_common(hex_str: &str) -> Result<(OperationHeader, &str), ForgeError> {
    let (source_hex, rest) = split_exact(hex_str, TZ_ADDRESS_HEX_LEN, "source")?;
    let source = parse_tz_address(source_hex)?;
    let (fee, rest) = take_zarith(rest)?;
    let (counter, rest) = take_zarith(rest)?;
    let (gas_limit, rest) = take_zarith(rest)?;
    let (storage_limit, rest) = take_zarith(rest)?;
    let header = OperationHeader {
        source: Some(source),
        fee: Some(fee),
        counter: Some(counter),
        gas_limit: Some(gas_limit),
        storage_limit: Some(storage_limit),
    };
    Ok((header, rest))
}

/// Reads one Zarith value off the head of the stream.
fn take_zarith(hex_str: &str) -> Result<(BigInt, &str), ForgeError> {
    let end = zarith::end_index(hex_str)?;
    let (value_hex, rest) = binary::split_rest(hex_str, end);
    Ok((zarith::decode(value_hex)?, rest))
}

/// Parses a 22-byte destination: `00 00 <20>` is tz1, `01 <20> 00` is KT1.
fn parse_address(hex_str: &str) -> Result<String, ForgeError> {
    let (tag, payload) = binary::split_rest(hex_str, 2);
    match tag {
        "00" => parse_tz_address(payload),
        "01" => {
            let (kt_payload, _padding) = binary::split_rest(payload, 40);
            encode_wire_payload(kt_payload, &KT1)
        }
        _ => Err(ForgeError::UnsupportedAddress {
            found: hex_str.to_string(),
        }),
    }
}

/// Parses a `00`-selector implicit address: `00 <20>` → tz1.
fn parse_tz_address(hex_str: &str) -> Result<String, ForgeError> {
    let (tag, payload) = binary::split_rest(hex_str, 2);
    if tag != "00" {
        return Err(ForgeError::UnsupportedAddress {
            found: hex_str.to_string(),
        });
    }
    encode_wire_payload(payload, &TZ1)
}

/// Parses a tagged public key: `00 <32>` → edpk.
fn parse_public_key(hex_str: &str) -> Result<String, ForgeError> {
    let (tag, payload) = binary::split_rest(hex_str, 2);
    if tag != "00" {
        return Err(ForgeError::UnsupportedPublicKey {
            found: hex_str.to_string(),
        });
    }
    base58::encode(payload, &EDPK).map_err(|source| ForgeError::BadPublicKey {
        key: payload.to_string(),
        source,
    })
}

fn encode_wire_payload(payload: &str, prefix: &base58::Prefix) -> Result<String, ForgeError> {
    base58::encode(payload, prefix).map_err(|source| ForgeError::BadAddress {
        role: "wire",
        address: payload.to_string(),
        source,
    })
}

/// Cuts exactly `len` characters off the stream or fails with what was
/// expected there.
fn split_exact<'a>(
    hex_str: &'a str,
    len: usize,
    expected: &'static str,
) -> Result<(&'a str, &'a str), ForgeError> {
    let (first, rest) = binary::split_rest(hex_str, len);
    if first.len() != len {
        return Err(ForgeError::Truncated { expected });
    }
    Ok((first, rest))
}
