use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeDelta, Utc};
use tg_auth::{
    error::VerificationError,
    identity::Identity,
    issuer::TokenIssuer,
    signing_key::{HmacAlgorithm, KeyPolicy, SigningKey},
    verifier::TokenVerifier,
};

const SECRET_A: &[u8] = b"secret-a-secret-a-secret-a-secret-a-secret-a-secret-a-secret-a!!";
const SECRET_B: &[u8] = b"secret-b-secret-b-secret-b-secret-b-secret-b-secret-b-secret-b!!";

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn key(secret: &[u8]) -> Arc<SigningKey> {
    Arc::new(SigningKey::from_secret(secret, HmacAlgorithm::HS512, KeyPolicy::Strict).unwrap())
}

fn identity(value: &str) -> Identity {
    Identity::new(value).unwrap()
}

#[test]
fn issued_token_is_immediately_verifiable() {
    let key = key(SECRET_A);
    let issuer = TokenIssuer::new(key.clone(), TimeDelta::hours(24));
    let verifier = TokenVerifier::new(key);

    for (i, who) in ["a@x.com", "b@x.com", "someone.else@example.org"].iter().enumerate() {
        let now = at(1_700_000_000 + i as i64);
        let token = issuer.issue(&identity(who), now).unwrap().token;
        assert_eq!(verifier.verify(&token, now), Ok(identity(who)));
    }
}

#[test]
fn one_hour_token_expires_exactly_at_the_boundary() {
    let key = key(SECRET_A);
    let issuer = TokenIssuer::new(key.clone(), TimeDelta::hours(1));
    let verifier = TokenVerifier::new(key);

    let t0 = 1000;
    let token = issuer.issue(&identity("user@example.com"), at(t0)).unwrap().token;

    assert_eq!(
        verifier.verify(&token, at(t0 + 3599)),
        Ok(identity("user@example.com"))
    );
    assert_eq!(
        verifier.verify(&token, at(t0 + 3600)),
        Err(VerificationError::Expired)
    );
    assert_eq!(
        verifier.verify(&token, at(t0 + 100_000)),
        Err(VerificationError::Expired)
    );
}

#[test]
fn flipping_any_signature_bit_is_detected() {
    let key = key(SECRET_A);
    let issuer = TokenIssuer::new(key.clone(), TimeDelta::hours(1));
    let verifier = TokenVerifier::new(key);
    let token = issuer.issue(&identity("user@example.com"), at(0)).unwrap().token;

    let (message, signature) = token.rsplit_once('.').unwrap();
    let signature = URL_SAFE_NO_PAD.decode(signature).unwrap();

    for byte in 0..signature.len() {
        for bit in 0..8 {
            let mut tampered = signature.clone();
            tampered[byte] ^= 1 << bit;
            let forged = format!("{message}.{}", URL_SAFE_NO_PAD.encode(&tampered));
            assert_eq!(
                verifier.verify(&forged, at(0)),
                Err(VerificationError::BadSignature),
                "byte {byte} bit {bit}"
            );
        }
    }
}

#[test]
fn tampered_payload_is_a_bad_signature() {
    let key = key(SECRET_A);
    let issuer = TokenIssuer::new(key.clone(), TimeDelta::hours(1));
    let verifier = TokenVerifier::new(key);
    let token = issuer.issue(&identity("victim@x.com"), at(0)).unwrap().token;

    let mut parts = token.split('.');
    let (header, payload, signature) = (
        parts.next().unwrap(),
        parts.next().unwrap(),
        parts.next().unwrap(),
    );
    let claims = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
    let forged_claims = claims.replace("victim@x.com", "attacker@x.com");
    let forged = format!(
        "{header}.{}.{signature}",
        URL_SAFE_NO_PAD.encode(forged_claims)
    );

    assert_eq!(
        verifier.verify(&forged, at(0)),
        Err(VerificationError::BadSignature)
    );
}

#[test]
fn rotated_key_rejects_old_tokens() {
    let issuer = TokenIssuer::new(key(SECRET_A), TimeDelta::hours(1));
    let verifier = TokenVerifier::new(key(SECRET_B));
    let token = issuer.issue(&identity("user@example.com"), at(0)).unwrap().token;

    assert_eq!(
        verifier.verify(&token, at(0)),
        Err(VerificationError::BadSignature)
    );
}

#[test]
fn same_secret_verifies_across_independently_built_keys() {
    // Two "processes" configured with the same secret.
    let issuer = TokenIssuer::new(key(SECRET_A), TimeDelta::hours(1));
    let verifier = TokenVerifier::new(key(SECRET_A));
    let token = issuer.issue(&identity("user@example.com"), at(0)).unwrap().token;

    assert!(verifier.verify(&token, at(0)).is_ok());
}

#[test]
fn validate_against_detects_replay_for_another_identity() {
    let key = key(SECRET_A);
    let issuer = TokenIssuer::new(key.clone(), TimeDelta::hours(1));
    let verifier = TokenVerifier::new(key);
    let token = issuer.issue(&identity("alice@x.com"), at(0)).unwrap().token;

    assert_eq!(
        verifier.validate_against(&token, &identity("bob@x.com"), at(0)),
        Err(VerificationError::IdentityMismatch)
    );
    assert_eq!(
        verifier.validate_against(&token, &identity("alice@x.com"), at(0)),
        Ok(identity("alice@x.com"))
    );
}

#[test]
fn signed_token_without_subject_is_refused() {
    // Correctly signed, but the payload has no `sub`.
    let secret = [9u8; 32];
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &serde_json::json!({"iss": "tokengate", "iat": 0, "exp": 3600}),
        &jsonwebtoken::EncodingKey::from_secret(&secret),
    )
    .unwrap();

    let key = Arc::new(
        SigningKey::from_secret(&secret, HmacAlgorithm::HS256, KeyPolicy::Strict).unwrap(),
    );
    assert_eq!(
        TokenVerifier::new(key).verify(&token, at(0)),
        Err(VerificationError::MissingSubject)
    );
}

#[test]
fn verifier_survives_arbitrary_input() {
    let verifier = TokenVerifier::new(key(SECRET_A));
    let inputs = [
        "Bearer abc",
        "eyJ.eyJ.sig",
        "....",
        "%%%.%%%.%%%",
        "eyJhbGciOiJub25lIn0.eyJzdWIiOiJ4In0.",
        "eyJhbGciOiJIUzUxMiJ9.bm90IGpzb24.AAAA",
    ];
    for input in inputs {
        assert_eq!(
            verifier.verify(input, at(0)),
            Err(VerificationError::Malformed),
            "{input}"
        );
    }
    let long = "a".repeat(64 * 1024);
    assert_eq!(
        verifier.verify(&long, at(0)),
        Err(VerificationError::Malformed)
    );
}

#[test]
fn broken_payload_is_malformed_even_with_a_real_signature() {
    let key = key(SECRET_A);
    let issuer = TokenIssuer::new(key.clone(), TimeDelta::hours(1));
    let verifier = TokenVerifier::new(key);
    let token = issuer.issue(&identity("user@x.com"), at(0)).unwrap().token;

    let mut parts = token.split('.');
    let (header, _, signature) = (
        parts.next().unwrap(),
        parts.next().unwrap(),
        parts.next().unwrap(),
    );
    let not_json = URL_SAFE_NO_PAD.encode("not json");
    let no_expiry = URL_SAFE_NO_PAD.encode(r#"{"sub":"user@x.com"}"#);

    for payload in ["%%%", not_json.as_str(), no_expiry.as_str(), ""] {
        let broken = format!("{header}.{payload}.{signature}");
        assert_eq!(
            verifier.verify(&broken, at(0)),
            Err(VerificationError::Malformed),
            "payload {payload:?}"
        );
    }
}
