use anyhow::{anyhow, Context};
use jsonwebtoken::{Algorithm, DecodingKey};
use std::str::FromStr;

///
/// Parses the comma separated algorithm list from
/// `SCHOLARSHIP_NOTIFIER_API_JWT_ALGORITHMS`, eg. `HS256` or
/// `RS256, RS384`.
///
pub fn parse_jwt_algorithms(algorithms: String) -> anyhow::Result<Vec<Algorithm>> {
    algorithms
        .split(',')
        .map(str::trim)
        .map(|name| {
            Algorithm::from_str(name).map_err(|_| anyhow!("unsupported jwt algorithm '{name}'"))
        })
        .collect()
}

///
/// Builds the decoding key for the algorithm family.
/// HMAC takes the raw secret, every other family expects
/// a PEM encoded public key.
///
pub fn parse_jwt_key(algorithm: &Algorithm, key: String) -> anyhow::Result<DecodingKey> {
    let key_bytes = key.as_bytes();

    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            DecodingKey::from_secret(key_bytes)
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => {
            DecodingKey::from_rsa_pem(key_bytes).context("invalid rsa pem key")?
        }
        Algorithm::ES256 | Algorithm::ES384 => {
            DecodingKey::from_ec_pem(key_bytes).context("invalid ec pem key")?
        }
        Algorithm::EdDSA => DecodingKey::from_ed_pem(key_bytes).context("invalid ed pem key")?,
    };

    Ok(key)
}
