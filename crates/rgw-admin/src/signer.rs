//! AWS Signature V2 request signing
//!
//! The radosgw admin API authenticates requests with the legacy S3 V2
//! scheme: an HMAC-SHA1 over a short canonical string built from the method,
//! the date and the URL path. Query parameters, content type and content
//! hash are not part of the signature.
//! Reference: https://docs.aws.amazon.com/AmazonS3/latest/userguide/RESTAuthentication.html

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::header::{AUTHORIZATION, DATE, InvalidHeaderValue};
use http::{HeaderMap, HeaderValue, Method};
use sha1::Sha1;

use crate::config::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// Date layout used in both the `Date` header and the string to sign
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Headers produced by signing a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Value for the `Date` header
    pub date: String,
    /// Value for the `Authorization` header (`AWS <access-key-id>:<signature>`)
    pub authorization: String,
}

impl SignedHeaders {
    /// Set `Date` and `Authorization` on a header map, replacing any previous values
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
        headers.insert(DATE, HeaderValue::from_str(&self.date)?);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&self.authorization)?);
        Ok(())
    }
}

/// Format a timestamp the way the gateway expects it in the `Date` header
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format(HTTP_DATE_FORMAT).to_string()
}

/// Build the string to sign: `METHOD\n\n\nDATE\nPATH`
///
/// The content-MD5 and content-type lines are left empty.
pub fn string_to_sign(method: &Method, date: &str, path: &str) -> String {
    format!("{}\n{}\n{}\n{}\n{}", method.as_str(), "", "", date, path)
}

/// Calculate the base64 encoded HMAC-SHA1 of `string_to_sign` keyed by the secret
pub fn calculate_signature(secret_access_key: &str, string_to_sign: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(secret_access_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Sign a request described by method and path at a fixed point in time
///
/// The timestamp is captured once and used for both the string to sign and
/// the `Date` header, so signing twice with the same inputs is deterministic.
pub fn sign(
    method: &Method,
    path: &str,
    credentials: &Credentials,
    now: DateTime<Utc>,
) -> SignedHeaders {
    let date = http_date(now);
    let string_to_sign = string_to_sign(method, &date, path);
    let signature = calculate_signature(credentials.secret_access_key(), &string_to_sign);

    SignedHeaders {
        authorization: format!("AWS {}:{}", credentials.access_key_id(), signature),
        date,
    }
}

/// Sign an outbound request in place using the current wall-clock time
pub fn sign_request(
    request: &mut reqwest::Request,
    credentials: &Credentials,
) -> Result<(), InvalidHeaderValue> {
    let signed = sign(
        request.method(),
        request.url().path(),
        credentials,
        Utc::now(),
    );
    signed.apply(request.headers_mut())
}
