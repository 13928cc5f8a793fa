use asn1::Time;
use chrono::{DateTime, Utc};
use der::{Node, Tag};
use kensa::decoder::Decoder;
use serde::Serialize;

use crate::error::{Error, FieldContext};

const MILLISECONDS_PER_DAY: i64 = 86_400_000;

/*
Validity ::= SEQUENCE {
    notBefore      Time,
    notAfter       Time }

Time ::= CHOICE {
    utcTime        UTCTime,
    generalTime    GeneralizedTime }
 */

/// The validity window, evaluated against a reference instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validity {
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Whole days until `not_after`, rounded toward negative infinity.
    pub days_remaining: i64,
    /// Strictly after `not_after`; the expiry instant itself is still valid.
    pub is_expired: bool,
}

impl Validity {
    pub fn new(not_before: DateTime<Utc>, not_after: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days_remaining = (not_after - now)
            .num_milliseconds()
            .div_euclid(MILLISECONDS_PER_DAY);
        Validity {
            not_before,
            not_after,
            days_remaining,
            is_expired: now > not_after,
        }
    }

    pub(crate) fn from_node(node: &Node<'_>, now: DateTime<Utc>) -> Result<Self, Error> {
        if node.tag() != Tag::SEQUENCE {
            return Err(Error::malformed(
                "validity",
                format!("expected SEQUENCE, found {}", node.tag()),
            ));
        }
        let mut children = node.children();
        let (Some(not_before), Some(not_after), None) =
            (children.next(), children.next(), children.next())
        else {
            return Err(Error::malformed("validity", "expected exactly two times"));
        };
        let not_before: Time = not_before.decode().field("notBefore")?;
        let not_after: Time = not_after.decode().field("notAfter")?;
        Ok(Validity::new(not_before.to_utc(), not_after.to_utc(), now))
    }
}
