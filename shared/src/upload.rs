use crate::{
    config::Config,
    error::UploadError,
    key::new_key,
    policy::UploadRequest,
    presign::{PresignPut, WriteIntent, UPLOAD_TTL},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub upload_url: String,
    pub public_url: String,
    pub key: String,
}

/// Validates `req`, picks a key for it and presigns a single `PUT` of that key.
pub async fn authorize_upload<S: PresignPut + ?Sized>(
    req: UploadRequest,
    signer: &S,
    cfg: &Config,
) -> Result<Authorization, UploadError> {
    let upload = req.validate()?;
    let key = new_key(&upload.filename);

    let intent = WriteIntent {
        bucket: cfg.bucket()?.to_string(),
        key,
        content_type: upload.content_type,
    };
    let upload_url = signer.presign_put(&intent, UPLOAD_TTL).await?;
    let public_url = public_url(cfg.public_base_url()?, &intent.key);

    tracing::event!(
        tracing::Level::INFO,
        key = %intent.key,
        content_type = %intent.content_type,
        "issued upload authorization"
    );

    Ok(Authorization {
        upload_url,
        public_url,
        key: intent.key,
    })
}

/// Where the object at `key` will be served from. Drops one trailing `/` of `base`.
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.strip_suffix('/').unwrap_or(base), key)
}
