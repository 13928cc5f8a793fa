//! Names for well-known object identifiers.
//!
//! The table is a plain `match`, so it lives in read-only data and needs no
//! initialization.

use asn1::ObjectIdentifier;

// Attribute types (X.520, PKCS #9, RFC 4519)
pub const OID_COMMON_NAME: &str = "2.5.4.3";
pub const OID_SURNAME: &str = "2.5.4.4";
pub const OID_SERIAL_NUMBER: &str = "2.5.4.5";
pub const OID_COUNTRY_NAME: &str = "2.5.4.6";
pub const OID_LOCALITY_NAME: &str = "2.5.4.7";
pub const OID_STATE_OR_PROVINCE_NAME: &str = "2.5.4.8";
pub const OID_STREET_ADDRESS: &str = "2.5.4.9";
pub const OID_ORGANIZATION_NAME: &str = "2.5.4.10";
pub const OID_ORGANIZATIONAL_UNIT_NAME: &str = "2.5.4.11";
pub const OID_TITLE: &str = "2.5.4.12";
pub const OID_BUSINESS_CATEGORY: &str = "2.5.4.15";
pub const OID_POSTAL_CODE: &str = "2.5.4.17";
pub const OID_GIVEN_NAME: &str = "2.5.4.42";
pub const OID_INITIALS: &str = "2.5.4.43";
pub const OID_GENERATION_QUALIFIER: &str = "2.5.4.44";
pub const OID_DN_QUALIFIER: &str = "2.5.4.46";
pub const OID_PSEUDONYM: &str = "2.5.4.65";
pub const OID_ORGANIZATION_IDENTIFIER: &str = "2.5.4.97";
pub const OID_USER_ID: &str = "0.9.2342.19200300.100.1.1";
pub const OID_DOMAIN_COMPONENT: &str = "0.9.2342.19200300.100.1.25";
pub const OID_EMAIL_ADDRESS: &str = "1.2.840.113549.1.9.1";
pub const OID_JURISDICTION_COUNTRY: &str = "1.3.6.1.4.1.311.60.2.1.3";

// Signature algorithms
pub const OID_MD5_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.4";
pub const OID_SHA1_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.5";
pub const OID_RSASSA_PSS: &str = "1.2.840.113549.1.1.10";
pub const OID_SHA256_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.11";
pub const OID_SHA384_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.12";
pub const OID_SHA512_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.13";
pub const OID_SHA224_WITH_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.14";
pub const OID_ECDSA_WITH_SHA1: &str = "1.2.840.10045.4.1";
pub const OID_ECDSA_WITH_SHA224: &str = "1.2.840.10045.4.3.1";
pub const OID_ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";
pub const OID_ECDSA_WITH_SHA384: &str = "1.2.840.10045.4.3.3";
pub const OID_ECDSA_WITH_SHA512: &str = "1.2.840.10045.4.3.4";
pub const OID_DSA_WITH_SHA1: &str = "1.2.840.10040.4.3";
pub const OID_DSA_WITH_SHA256: &str = "2.16.840.1.101.3.4.3.2";

// Public key algorithms
pub const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
pub const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
pub const OID_DSA: &str = "1.2.840.10040.4.1";
pub const OID_X25519: &str = "1.3.101.110";
pub const OID_X448: &str = "1.3.101.111";
pub const OID_ED25519: &str = "1.3.101.112";
pub const OID_ED448: &str = "1.3.101.113";

// Named curves
pub const OID_PRIME256V1: &str = "1.2.840.10045.3.1.7";
pub const OID_SECP256K1: &str = "1.3.132.0.10";
pub const OID_SECP384R1: &str = "1.3.132.0.34";
pub const OID_SECP521R1: &str = "1.3.132.0.35";

// Certificate extensions
pub const OID_SUBJECT_KEY_IDENTIFIER: &str = "2.5.29.14";
pub const OID_KEY_USAGE: &str = "2.5.29.15";
pub const OID_SUBJECT_ALT_NAME: &str = "2.5.29.17";
pub const OID_ISSUER_ALT_NAME: &str = "2.5.29.18";
pub const OID_BASIC_CONSTRAINTS: &str = "2.5.29.19";
pub const OID_NAME_CONSTRAINTS: &str = "2.5.29.30";
pub const OID_CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";
pub const OID_CERTIFICATE_POLICIES: &str = "2.5.29.32";
pub const OID_POLICY_MAPPINGS: &str = "2.5.29.33";
pub const OID_AUTHORITY_KEY_IDENTIFIER: &str = "2.5.29.35";
pub const OID_POLICY_CONSTRAINTS: &str = "2.5.29.36";
pub const OID_EXT_KEY_USAGE: &str = "2.5.29.37";
pub const OID_FRESHEST_CRL: &str = "2.5.29.46";
pub const OID_INHIBIT_ANY_POLICY: &str = "2.5.29.54";
pub const OID_AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
pub const OID_SUBJECT_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.11";
pub const OID_TLS_FEATURE: &str = "1.3.6.1.5.5.7.1.24";
pub const OID_CT_PRECERT_SCTS: &str = "1.3.6.1.4.1.11129.2.4.2";
pub const OID_CT_PRECERT_POISON: &str = "1.3.6.1.4.1.11129.2.4.3";

// Extended key usage purposes
pub const OID_ANY_EXTENDED_KEY_USAGE: &str = "2.5.29.37.0";
pub const OID_SERVER_AUTH: &str = "1.3.6.1.5.5.7.3.1";
pub const OID_CLIENT_AUTH: &str = "1.3.6.1.5.5.7.3.2";
pub const OID_CODE_SIGNING: &str = "1.3.6.1.5.5.7.3.3";
pub const OID_EMAIL_PROTECTION: &str = "1.3.6.1.5.5.7.3.4";
pub const OID_TIME_STAMPING: &str = "1.3.6.1.5.5.7.3.8";
pub const OID_OCSP_SIGNING: &str = "1.3.6.1.5.5.7.3.9";

/// Looks up the conventional name of a dotted OID.
pub fn oid_name(oid: &str) -> Option<&'static str> {
    let name = match oid {
        OID_COMMON_NAME => "CN",
        OID_SURNAME => "SN",
        OID_SERIAL_NUMBER => "serialNumber",
        OID_COUNTRY_NAME => "C",
        OID_LOCALITY_NAME => "L",
        OID_STATE_OR_PROVINCE_NAME => "ST",
        OID_STREET_ADDRESS => "street",
        OID_ORGANIZATION_NAME => "O",
        OID_ORGANIZATIONAL_UNIT_NAME => "OU",
        OID_TITLE => "title",
        OID_BUSINESS_CATEGORY => "businessCategory",
        OID_POSTAL_CODE => "postalCode",
        OID_GIVEN_NAME => "GN",
        OID_INITIALS => "initials",
        OID_GENERATION_QUALIFIER => "generationQualifier",
        OID_DN_QUALIFIER => "dnQualifier",
        OID_PSEUDONYM => "pseudonym",
        OID_ORGANIZATION_IDENTIFIER => "organizationIdentifier",
        OID_USER_ID => "UID",
        OID_DOMAIN_COMPONENT => "DC",
        OID_EMAIL_ADDRESS => "emailAddress",
        OID_JURISDICTION_COUNTRY => "jurisdictionC",

        OID_MD5_WITH_RSA_ENCRYPTION => "MD5withRSA",
        OID_SHA1_WITH_RSA_ENCRYPTION => "SHA1withRSA",
        OID_RSASSA_PSS => "RSASSA-PSS",
        OID_SHA256_WITH_RSA_ENCRYPTION => "SHA256withRSA",
        OID_SHA384_WITH_RSA_ENCRYPTION => "SHA384withRSA",
        OID_SHA512_WITH_RSA_ENCRYPTION => "SHA512withRSA",
        OID_SHA224_WITH_RSA_ENCRYPTION => "SHA224withRSA",
        OID_ECDSA_WITH_SHA1 => "SHA1withECDSA",
        OID_ECDSA_WITH_SHA224 => "SHA224withECDSA",
        OID_ECDSA_WITH_SHA256 => "SHA256withECDSA",
        OID_ECDSA_WITH_SHA384 => "SHA384withECDSA",
        OID_ECDSA_WITH_SHA512 => "SHA512withECDSA",
        OID_DSA_WITH_SHA1 => "SHA1withDSA",
        OID_DSA_WITH_SHA256 => "SHA256withDSA",

        OID_RSA_ENCRYPTION => "RSA",
        OID_EC_PUBLIC_KEY => "EC",
        OID_DSA => "DSA",
        OID_X25519 => "X25519",
        OID_X448 => "X448",
        OID_ED25519 => "Ed25519",
        OID_ED448 => "Ed448",

        OID_PRIME256V1 => "P-256",
        OID_SECP256K1 => "secp256k1",
        OID_SECP384R1 => "P-384",
        OID_SECP521R1 => "P-521",

        OID_SUBJECT_KEY_IDENTIFIER => "subjectKeyIdentifier",
        OID_KEY_USAGE => "keyUsage",
        OID_SUBJECT_ALT_NAME => "subjectAltName",
        OID_ISSUER_ALT_NAME => "issuerAltName",
        OID_BASIC_CONSTRAINTS => "basicConstraints",
        OID_NAME_CONSTRAINTS => "nameConstraints",
        OID_CRL_DISTRIBUTION_POINTS => "cRLDistributionPoints",
        OID_CERTIFICATE_POLICIES => "certificatePolicies",
        OID_POLICY_MAPPINGS => "policyMappings",
        OID_AUTHORITY_KEY_IDENTIFIER => "authorityKeyIdentifier",
        OID_POLICY_CONSTRAINTS => "policyConstraints",
        OID_EXT_KEY_USAGE => "extKeyUsage",
        OID_FRESHEST_CRL => "freshestCRL",
        OID_INHIBIT_ANY_POLICY => "inhibitAnyPolicy",
        OID_AUTHORITY_INFO_ACCESS => "authorityInfoAccess",
        OID_SUBJECT_INFO_ACCESS => "subjectInfoAccess",
        OID_TLS_FEATURE => "tlsFeature",
        OID_CT_PRECERT_SCTS => "ctPrecertificateSCTs",
        OID_CT_PRECERT_POISON => "ctPrecertificatePoison",

        OID_ANY_EXTENDED_KEY_USAGE => "Any Extended Key Usage",
        OID_SERVER_AUTH => "Server Authentication",
        OID_CLIENT_AUTH => "Client Authentication",
        OID_CODE_SIGNING => "Code Signing",
        OID_EMAIL_PROTECTION => "Email Protection",
        OID_TIME_STAMPING => "Time Stamping",
        OID_OCSP_SIGNING => "OCSP Signing",

        _ => return None,
    };
    Some(name)
}

/// The conventional name of `oid`, or the dotted string itself when the
/// OID is not in the table.
pub fn resolve_oid_name(oid: &str) -> String {
    oid_name(oid).map_or_else(|| oid.to_string(), str::to_string)
}

/// Types whose OID has a conventional name.
pub trait OidName {
    fn oid_name(&self) -> Option<&'static str>;

    /// The name, falling back to the dotted OID.
    fn resolved_name(&self) -> String;
}

impl OidName for ObjectIdentifier {
    fn oid_name(&self) -> Option<&'static str> {
        oid_name(&self.to_string())
    }

    fn resolved_name(&self) -> String {
        resolve_oid_name(&self.to_string())
    }
}
