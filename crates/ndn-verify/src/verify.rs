//! Signature and digest verification
//!
//! Every entry point reduces its arguments to the signed bytes, the
//! signature bytes and either a key or a digest algorithm, then hands them to
//! one dispatch function. A signature that does not match yields `Ok(false)`;
//! errors are reserved for input that cannot be checked at all.

use ndn_crypto::{compute_digest, PublicKey};
use ndn_types::{
    Data, DigestAlgorithm, InputBuffers, Interest, KeyType, SignatureType, SignedPacket,
};
use tracing::{debug, warn};

use crate::config::VerifierConfig;
use crate::error::{Error, Result};
use crate::key_ref::KeyRef;

/// Stateless signature verifier
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerifierConfig,
}

impl Verifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify a signature over the concatenation of `input`
    pub fn verify_signature<'a>(
        &self,
        input: impl Into<InputBuffers<'a>>,
        signature: &[u8],
        key: KeyRef<'_>,
    ) -> Result<bool> {
        self.dispatch(input.into(), signature, key, None)
    }

    /// Verify the signature of a Data packet
    pub fn verify_data(&self, data: &Data, key: KeyRef<'_>) -> Result<bool> {
        self.verify_packet(data, key)
    }

    /// Verify the signature of a signed Interest
    pub fn verify_interest(&self, interest: &Interest, key: KeyRef<'_>) -> Result<bool> {
        self.verify_packet(interest, key)
    }

    /// Verify the signature of any signed packet
    pub fn verify_packet<P: SignedPacket + ?Sized>(&self, packet: &P, key: KeyRef<'_>) -> Result<bool> {
        let ranges = packet.signed_ranges()?;
        let signature_type = packet
            .signature_info()
            .map(|info| info.signature_type());
        let signature = packet.signature_value().ok_or(Error::MissingSignatureValue)?;
        self.dispatch(ranges.buffers(), signature, key, signature_type)
    }

    fn dispatch(
        &self,
        input: InputBuffers<'_>,
        signature: &[u8],
        key: KeyRef<'_>,
        signature_type: Option<SignatureType>,
    ) -> Result<bool> {
        debug!(path = key.kind(), ?signature_type, ranges = input.len(), "verifying signature");
        match key {
            KeyRef::Raw(bytes) => {
                let public = PublicKey::from_der(bytes)?;
                self.verify_public(&public, public.key_type(), input, signature, signature_type)
            }
            KeyRef::PublicKey(public) => {
                self.verify_public(public, public.key_type(), input, signature, signature_type)
            }
            KeyRef::Pib(key) => {
                // the stored type carries an EC-ALT hint the encoding may lack
                let public = PublicKey::from_der(&key.public_key()?)?;
                self.verify_public(&public, key.key_type()?, input, signature, signature_type)
            }
            KeyRef::Certificate(Some(cert)) => {
                self.dispatch(input, signature, KeyRef::Raw(cert.public_key()), signature_type)
            }
            KeyRef::Certificate(None) => {
                let digest = self.fallback_digest(signature_type)?;
                warn!(%digest, "no certificate given, checking the signature as a digest");
                verify_digest_with(input, signature, digest)
            }
            KeyRef::Module {
                module,
                key_name,
                digest,
            } => Ok(ndn_tpm::verify_with_module(
                module, key_name, digest, input, signature,
            )?),
        }
    }

    fn verify_public(
        &self,
        public: &PublicKey,
        key_type: KeyType,
        input: InputBuffers<'_>,
        signature: &[u8],
        signature_type: Option<SignatureType>,
    ) -> Result<bool> {
        let digest = match (signature_type, key_type) {
            (Some(signature_type), _) => signature_type.digest_algorithm(),
            (None, KeyType::EcAlt) => DigestAlgorithm::Sm3,
            (None, _) => self.config.signature_digest,
        };
        debug!(%key_type, %digest, "verifying with public key");
        Ok(public.verify_with_digest(input, signature, digest)?)
    }

    /// Digest that a certificate-less check compares against
    fn fallback_digest(&self, signature_type: Option<SignatureType>) -> Result<DigestAlgorithm> {
        if !self.config.self_verifying_fallback {
            return Err(Error::FallbackDisabled);
        }
        match signature_type {
            None => Ok(self.config.fallback_digest),
            Some(SignatureType::DigestSha256) => Ok(DigestAlgorithm::Sha256),
            Some(other) => Err(Error::NotSelfVerifying(other)),
        }
    }

    /// Check that `digest` is the `algorithm` digest of `input`
    ///
    /// Fails only when `algorithm` is unavailable.
    pub fn verify_digest<'a>(
        &self,
        input: impl Into<InputBuffers<'a>>,
        digest: &[u8],
        algorithm: DigestAlgorithm,
    ) -> Result<bool> {
        verify_digest_with(input.into(), digest, algorithm)
    }

    /// Check that the signature value of a Data packet is a digest of its
    /// signed portion
    pub fn verify_data_digest(&self, data: &Data, algorithm: DigestAlgorithm) -> Result<bool> {
        self.verify_packet_digest(data, algorithm)
    }

    /// Check that the signature value of an Interest is a digest of its
    /// signed portion
    pub fn verify_interest_digest(&self, interest: &Interest, algorithm: DigestAlgorithm) -> Result<bool> {
        self.verify_packet_digest(interest, algorithm)
    }

    fn verify_packet_digest<P: SignedPacket + ?Sized>(
        &self,
        packet: &P,
        algorithm: DigestAlgorithm,
    ) -> Result<bool> {
        let ranges = packet.signed_ranges()?;
        let value = packet.signature_value().ok_or(Error::MissingSignatureValue)?;
        verify_digest_with(ranges.buffers(), value, algorithm)
    }
}

fn verify_digest_with(input: InputBuffers<'_>, digest: &[u8], algorithm: DigestAlgorithm) -> Result<bool> {
    let computed = compute_digest(input, algorithm)?;
    Ok(computed == digest)
}

/// [`Verifier::verify_signature`] with the default configuration
pub fn verify_signature<'a>(
    input: impl Into<InputBuffers<'a>>,
    signature: &[u8],
    key: KeyRef<'_>,
) -> Result<bool> {
    Verifier::default().verify_signature(input, signature, key)
}

/// [`Verifier::verify_data`] with the default configuration
pub fn verify_data(data: &Data, key: KeyRef<'_>) -> Result<bool> {
    Verifier::default().verify_data(data, key)
}

/// [`Verifier::verify_interest`] with the default configuration
pub fn verify_interest(interest: &Interest, key: KeyRef<'_>) -> Result<bool> {
    Verifier::default().verify_interest(interest, key)
}

pub fn verify_digest<'a>(
    input: impl Into<InputBuffers<'a>>,
    digest: &[u8],
    algorithm: DigestAlgorithm,
) -> Result<bool> {
    Verifier::default().verify_digest(input, digest, algorithm)
}

pub fn verify_data_digest(data: &Data, algorithm: DigestAlgorithm) -> Result<bool> {
    Verifier::default().verify_data_digest(data, algorithm)
}

pub fn verify_interest_digest(interest: &Interest, algorithm: DigestAlgorithm) -> Result<bool> {
    Verifier::default().verify_interest_digest(interest, algorithm)
}
