use crate::error::UploadError;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3 as s3;
use aws_sdk_s3::config::Credentials;
use std::{env, fmt};

pub const ENDPOINT_VAR: &str = "R2_ENDPOINT";
pub const ACCESS_KEY_ID_VAR: &str = "R2_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "R2_SECRET_ACCESS_KEY";
pub const BUCKET_VAR: &str = "R2_BUCKET";
pub const PUBLIC_BASE_URL_VAR: &str = "PUBLIC_BASE_URL";
pub const REGION_VAR: &str = "R2_REGION";
pub const FORCE_PATH_STYLE_VAR: &str = "R2_FORCE_PATH_STYLE";

const DEFAULT_REGION: &str = "auto";

/// Storage settings read from the environment at cold start.
///
/// The required values stay optional here; a missing one only fails the
/// request that needs it.
#[derive(Clone)]
pub struct Config {
    /// S3-compatible endpoint, e.g. `https://<account>.r2.cloudflarestorage.com`.
    pub endpoint: Option<String>,

    pub access_key_id: Option<String>,

    pub secret_access_key: Option<String>,

    /// Bucket the presigned writes target.
    pub bucket: Option<String>,

    /// Prefix objects are publicly served under once uploaded.
    pub public_base_url: Option<String>,

    /// Signing region, R2 expects `auto`.
    pub region: String,

    /// Address buckets as `<endpoint>/<bucket>` instead of `<bucket>.<endpoint>`.
    pub force_path_style: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Config {
            endpoint: var(ENDPOINT_VAR),
            access_key_id: var(ACCESS_KEY_ID_VAR),
            secret_access_key: var(SECRET_ACCESS_KEY_VAR),
            bucket: var(BUCKET_VAR),
            public_base_url: var(PUBLIC_BASE_URL_VAR),
            region: var(REGION_VAR).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            force_path_style: var(FORCE_PATH_STYLE_VAR)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
                .unwrap_or(false),
        };

        tracing::event!(tracing::Level::DEBUG, "{:?}", config);

        config
    }

    pub fn bucket(&self) -> Result<&str, UploadError> {
        required(&self.bucket, BUCKET_VAR)
    }

    pub fn public_base_url(&self) -> Result<&str, UploadError> {
        required(&self.public_base_url, PUBLIC_BASE_URL_VAR)
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, UploadError> {
    value.as_deref().ok_or(UploadError::MissingConfig(name))
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("bucket", &self.bucket)
            .field("public_base_url", &self.public_base_url)
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

/// Builds the S3 client against the configured endpoint with static credentials.
pub async fn get_s3_client(cfg: &Config) -> Result<s3::Client, UploadError> {
    let endpoint = required(&cfg.endpoint, ENDPOINT_VAR)?;
    let access_key_id = required(&cfg.access_key_id, ACCESS_KEY_ID_VAR)?;
    let secret_access_key = required(&cfg.secret_access_key, SECRET_ACCESS_KEY_VAR)?;

    let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "environment");
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(cfg.region.clone()))
        .endpoint_url(endpoint)
        .credentials_provider(credentials)
        .load()
        .await;
    let s3_config = s3::config::Builder::from(&sdk_config)
        .force_path_style(cfg.force_path_style)
        .build();

    Ok(s3::Client::from_conf(s3_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn reads_all_values() {
        let cfg = Config::from_lookup(lookup(&[
            (ENDPOINT_VAR, "https://acct.r2.cloudflarestorage.com"),
            (ACCESS_KEY_ID_VAR, "key-id"),
            (SECRET_ACCESS_KEY_VAR, "secret"),
            (BUCKET_VAR, "media"),
            (PUBLIC_BASE_URL_VAR, "https://cdn.example.com/"),
            (FORCE_PATH_STYLE_VAR, "TRUE"),
        ]));

        assert_eq!(cfg.bucket().unwrap(), "media");
        assert_eq!(cfg.public_base_url().unwrap(), "https://cdn.example.com/");
        assert_eq!(cfg.region, "auto");
        assert!(cfg.force_path_style);
    }

    #[test]
    fn empty_values_count_as_missing() {
        let cfg = Config::from_lookup(lookup(&[(BUCKET_VAR, "  "), (PUBLIC_BASE_URL_VAR, "")]));

        assert!(matches!(
            cfg.bucket(),
            Err(UploadError::MissingConfig(BUCKET_VAR))
        ));
        assert!(matches!(
            cfg.public_base_url(),
            Err(UploadError::MissingConfig(PUBLIC_BASE_URL_VAR))
        ));
        assert!(!cfg.force_path_style);
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = Config::from_lookup(lookup(&[(SECRET_ACCESS_KEY_VAR, "hunter2")]));
        let out = format!("{:?}", cfg);

        assert!(!out.contains("hunter2"));
        assert!(out.contains("<redacted>"));
    }

    #[tokio::test]
    async fn client_requires_endpoint_and_credentials() {
        let cfg = Config::from_lookup(lookup(&[(ACCESS_KEY_ID_VAR, "key-id")]));
        let res = get_s3_client(&cfg).await;

        assert!(matches!(res, Err(UploadError::MissingConfig(ENDPOINT_VAR))));
    }
}
