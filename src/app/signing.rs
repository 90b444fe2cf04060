use anyhow::{anyhow, Context, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use time::OffsetDateTime;
use url::{form_urlencoded, Url};

type HmacSha256 = Hmac<Sha256>;

const EXPIRY_PARAM: &str = "exp";
const SIGNATURE_PARAM: &str = "sig";

/// Issues and checks expiring, HMAC-signed delivery URLs.
///
/// The signed message is `"{path}?{query}"` where the query already contains
/// `exp` and everything that preceded it, byte for byte as it appears in the
/// final URL. `sig` is always the last parameter.
#[derive(Clone)]
pub struct UrlSigner {
    key: Vec<u8>,
    ttl_seconds: u64,
}

impl UrlSigner {
    pub fn new(key: impl Into<Vec<u8>>, ttl_seconds: u64) -> Self {
        Self {
            key: key.into(),
            ttl_seconds,
        }
    }

    pub fn sign(&self, url: &str, now: OffsetDateTime) -> Result<String> {
        let mut url = Url::parse(url).with_context(|| format!("invalid variant url: {}", url))?;

        let ttl = i64::try_from(self.ttl_seconds).context("signed url ttl out of range")?;
        let expires_at = now
            .unix_timestamp()
            .checked_add(ttl)
            .ok_or_else(|| anyhow!("signed url expiry overflows"))?;

        url.query_pairs_mut()
            .append_pair(EXPIRY_PARAM, &expires_at.to_string());

        let signature = self.signature(url.path(), url.query().unwrap_or_default())?;
        url.query_pairs_mut()
            .append_pair(SIGNATURE_PARAM, &signature);

        Ok(url.to_string())
    }

    /// Checks a URL produced by [`UrlSigner::sign`]: signature over the exact
    /// path and query preceding `sig`, and an `exp` still in the future.
    pub fn verify(&self, url: &str, now: OffsetDateTime) -> Result<()> {
        let url = Url::parse(url).with_context(|| format!("invalid signed url: {}", url))?;
        let query = url
            .query()
            .ok_or_else(|| anyhow!("signed url has no query"))?;

        let (unsigned_query, signature) = query
            .rsplit_once("&sig=")
            .ok_or_else(|| anyhow!("signed url has no signature"))?;
        let signature = hex::decode(signature).context("signature is not hex")?;

        let expires_at = form_urlencoded::parse(unsigned_query.as_bytes())
            .filter(|(name, _)| name == EXPIRY_PARAM)
            .last()
            .ok_or_else(|| anyhow!("signed url has no expiry"))?
            .1
            .parse::<i64>()
            .context("signed url expiry is not a unix timestamp")?;

        let mut mac = self.mac()?;
        mac.update(format!("{}?{}", url.path(), unsigned_query).as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| anyhow!("signature mismatch"))?;

        if expires_at <= now.unix_timestamp() {
            return Err(anyhow!("signed url expired at {}", expires_at));
        }

        Ok(())
    }

    fn signature(&self, path: &str, query: &str) -> Result<String> {
        let mut mac = self.mac()?;
        mac.update(format!("{}?{}", path, query).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.key).map_err(|err| anyhow!("invalid signing key: {}", err))
    }
}
