use asn1::{BitString, Integer, ObjectIdentifier};
use der::{Der, Node, Tag};
use kensa::decoder::Decoder;
use serde::Serialize;

use crate::error::{Error, FieldContext};
use crate::oid_name::{
    OID_DSA, OID_EC_PUBLIC_KEY, OID_ED448, OID_ED25519, OID_PRIME256V1, OID_RSA_ENCRYPTION,
    OID_RSASSA_PSS, OID_SECP256K1, OID_SECP384R1, OID_SECP521R1, OID_X448, OID_X25519, OidName,
};

const FIELD: &str = "subjectPublicKeyInfo";
const RSA_KEY_SIZE_BUCKETS: [u32; 3] = [1024, 2048, 4096];

/*
SubjectPublicKeyInfo  ::=  SEQUENCE  {
    algorithm            AlgorithmIdentifier,
    subjectPublicKey     BIT STRING  }
 */

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_size: Option<u32>,
    /// Named curve for EC keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
}

/// Algorithm OID of an AlgorithmIdentifier SEQUENCE, plus its parameters.
pub(crate) fn algorithm_identifier<'a>(
    node: &Node<'a>,
    field: &'static str,
) -> Result<(ObjectIdentifier, Option<Node<'a>>), Error> {
    if node.tag() != Tag::SEQUENCE {
        return Err(Error::malformed(
            field,
            format!("expected AlgorithmIdentifier, found {}", node.tag()),
        ));
    }
    let algorithm = node
        .child(0)
        .ok_or_else(|| Error::malformed(field, "empty AlgorithmIdentifier"))?;
    let oid: ObjectIdentifier = algorithm.decode().field(field)?;
    Ok((oid, node.child(1)))
}

fn rsa_key_size(public_key: &BitString) -> u32 {
    // RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }
    let modulus_bits = Der::parse(public_key.as_bytes()).ok().and_then(|der| {
        let modulus = der.root()?.child(0)?;
        let modulus: Integer = modulus.decode().ok()?;
        u32::try_from(modulus.bits()).ok()
    });
    modulus_bits.unwrap_or_else(|| {
        tracing::debug!("RSAPublicKey did not decode, estimating key size from its length");
        let bits = public_key.as_bytes().len() as u32 * 8;
        RSA_KEY_SIZE_BUCKETS
            .into_iter()
            .min_by_key(|bucket| bucket.abs_diff(bits))
            .unwrap_or(2048)
    })
}

fn curve_key_size(curve: &str) -> Option<u32> {
    match curve {
        OID_PRIME256V1 | OID_SECP256K1 => Some(256),
        OID_SECP384R1 => Some(384),
        OID_SECP521R1 => Some(521),
        _ => None,
    }
}

// Dss-Parms ::= SEQUENCE { p INTEGER, q INTEGER, g INTEGER }
fn dsa_key_size(parameters: Option<Node<'_>>) -> Option<u32> {
    let p: Integer = parameters?.child(0)?.decode().ok()?;
    u32::try_from(p.bits()).ok()
}

impl KeyInfo {
    pub(crate) fn from_node(node: &Node<'_>) -> Result<Self, Error> {
        if node.tag() != Tag::SEQUENCE {
            return Err(Error::malformed(
                FIELD,
                format!("expected SEQUENCE, found {}", node.tag()),
            ));
        }
        let (Some(algorithm), Some(public_key)) = (node.child(0), node.child(1)) else {
            return Err(Error::malformed(FIELD, "expected algorithm and subjectPublicKey"));
        };
        let (oid, parameters) = algorithm_identifier(&algorithm, FIELD)?;
        let public_key: BitString = public_key.decode().field(FIELD)?;

        let mut curve = None;
        let key_size = match oid.to_string().as_str() {
            OID_RSA_ENCRYPTION | OID_RSASSA_PSS => Some(rsa_key_size(&public_key)),
            OID_EC_PUBLIC_KEY => {
                // namedCurve; implicit and specified curves carry no OID
                let named: Option<ObjectIdentifier> = parameters
                    .filter(|p| p.tag() == Tag::OBJECT_IDENTIFIER)
                    .and_then(|p| p.decode().ok());
                let size = named
                    .as_ref()
                    .and_then(|c| curve_key_size(&c.to_string()));
                curve = named.map(|c| c.resolved_name());
                size
            }
            OID_ED25519 | OID_X25519 => Some(256),
            OID_ED448 => Some(456),
            OID_X448 => Some(448),
            OID_DSA => dsa_key_size(parameters),
            _ => None,
        };

        Ok(KeyInfo {
            algorithm: oid.resolved_name(),
            key_size,
            curve,
        })
    }
}
