use crate::{
    config::{get_s3_client, Config},
    error::UploadError,
};
use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, presigning::PresigningConfig, Client};
use std::time::Duration;

/// Presigned writes expire after this long.
pub const UPLOAD_TTL: Duration = Duration::from_secs(60);

/// A single write the client is allowed to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteIntent {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
}

#[async_trait]
pub trait PresignPut: Send + Sync {
    /// Returns a URL that accepts one `PUT` of `intent` until `expires_in` elapses.
    async fn presign_put(
        &self,
        intent: &WriteIntent,
        expires_in: Duration,
    ) -> Result<String, UploadError>;
}

/// Presigns against an S3-compatible store.
///
/// Built once at cold start. A broken configuration is kept around and
/// reported on every presign attempt instead of stopping the process.
pub struct S3Presigner {
    client: Result<Client, &'static str>,
}

impl S3Presigner {
    pub async fn new(cfg: &Config) -> Self {
        let client = match get_s3_client(cfg).await {
            Ok(client) => Ok(client),
            Err(UploadError::MissingConfig(var)) => {
                tracing::event!(tracing::Level::WARN, "{} is not set, upload requests will fail", var);
                Err(var)
            }
            Err(e) => {
                tracing::event!(tracing::Level::ERROR, "failed to build s3 client: {}", e);
                Err("storage client")
            }
        };

        S3Presigner { client }
    }
}

#[async_trait]
impl PresignPut for S3Presigner {
    async fn presign_put(
        &self,
        intent: &WriteIntent,
        expires_in: Duration,
    ) -> Result<String, UploadError> {
        let client = self
            .client
            .as_ref()
            .map_err(|var| UploadError::MissingConfig(*var))?;
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| UploadError::Signing(DisplayErrorContext(&e).to_string()))?;

        let presigned = client
            .put_object()
            .bucket(&intent.bucket)
            .key(&intent.key)
            .content_type(&intent.content_type)
            .presigned(presigning)
            .await
            .map_err(|e| UploadError::Signing(DisplayErrorContext(&e).to_string()))?;

        Ok(presigned.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ACCESS_KEY_ID_VAR, BUCKET_VAR, ENDPOINT_VAR, FORCE_PATH_STYLE_VAR,
        SECRET_ACCESS_KEY_VAR,
    };

    fn cfg(vars: &[(&'static str, &'static str)]) -> Config {
        let vars = vars.to_vec();

        Config::from_lookup(move |name: &str| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        })
    }

    fn intent() -> WriteIntent {
        WriteIntent {
            bucket: "media".to_string(),
            key: "uploads/1718000000000-V1StGXR8_Z5j.png".to_string(),
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn presigns_scoped_put_url() {
        let signer = S3Presigner::new(&cfg(&[
            (ENDPOINT_VAR, "https://acct.r2.example.com"),
            (ACCESS_KEY_ID_VAR, "AKIDEXAMPLE"),
            (SECRET_ACCESS_KEY_VAR, "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
            (BUCKET_VAR, "media"),
            (FORCE_PATH_STYLE_VAR, "true"),
        ]))
        .await;

        let url = signer.presign_put(&intent(), UPLOAD_TTL).await.unwrap();

        assert!(
            url.starts_with("https://acct.r2.example.com/media/uploads/1718000000000-V1StGXR8_Z5j.png?"),
            "{}",
            url
        );
        assert!(url.contains("X-Amz-Expires=60"), "{}", url);
        assert!(url.contains("X-Amz-Signature="), "{}", url);
        assert!(
            url.contains("X-Amz-SignedHeaders=content-type%3Bhost"),
            "{}",
            url
        );
        assert!(url.contains("AKIDEXAMPLE"), "{}", url);
    }

    #[tokio::test]
    async fn missing_credentials_fail_at_presign_time() {
        let signer = S3Presigner::new(&cfg(&[(ENDPOINT_VAR, "https://acct.r2.example.com")])).await;

        let res = signer.presign_put(&intent(), UPLOAD_TTL).await;

        assert!(matches!(
            res,
            Err(UploadError::MissingConfig(ACCESS_KEY_ID_VAR))
        ));
    }
}
