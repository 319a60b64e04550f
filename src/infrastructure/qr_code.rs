//! QR image references built against an external rendering endpoint.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::domain::qr_code::QrCodeHost;
use crate::error::AppError;

/// Query parameter carrying the encoded content.
const DATA_PARAM: &str = "data";

/// [`QrCodeHost`] that points at an HTTP endpoint rendering QR images on
/// request, such as `https://api.qrserver.com/v1/create-qr-code/`.
///
/// Publishing is pure URL construction: the returned reference is the
/// endpoint with the encoded content appended as `data`. Any query already
/// present on the endpoint (size, format) is kept.
#[derive(Debug, Clone)]
pub struct EndpointQrCodeHost {
    endpoint: Url,
}

impl EndpointQrCodeHost {
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not an absolute http(s) URL.
    pub fn new(endpoint: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(url::ParseError::RelativeUrlWithoutBase);
        }
        Ok(Self { endpoint })
    }
}

#[async_trait]
impl QrCodeHost for EndpointQrCodeHost {
    async fn publish(&self, content: &str, name: &str) -> Result<String, AppError> {
        let mut image = self.endpoint.clone();
        image.query_pairs_mut().append_pair(DATA_PARAM, content);

        debug!(name, image = %image, "QR code reference published");
        Ok(image.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_appends_encoded_content() {
        let host =
            EndpointQrCodeHost::new("https://api.qrserver.com/v1/create-qr-code/?size=256x256")
                .unwrap();

        let image = host
            .publish("http://localhost:5500/promo", "promo")
            .await
            .unwrap();

        assert_eq!(
            image,
            "https://api.qrserver.com/v1/create-qr-code/?size=256x256&data=http%3A%2F%2Flocalhost%3A5500%2Fpromo"
        );
    }

    #[tokio::test]
    async fn test_publish_without_existing_query() {
        let host = EndpointQrCodeHost::new("https://qr.test/render").unwrap();

        let image = host.publish("https://lk.test/abcd", "abcd").await.unwrap();
        let parsed = Url::parse(&image).unwrap();

        assert_eq!(
            parsed.query_pairs().find(|(k, _)| k == "data").map(|(_, v)| v.into_owned()),
            Some("https://lk.test/abcd".to_string())
        );
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        assert!(EndpointQrCodeHost::new("ftp://qr.test/render").is_err());
        assert!(EndpointQrCodeHost::new("not a url").is_err());
    }
}
