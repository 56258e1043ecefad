use lambda_http::http::{Method, StatusCode};
use lambda_http::{Body, Error, Request, Response};
use serde::Serialize;
use serde_json::json;

use crate::{
    config::Config,
    error::UploadError,
    policy::UploadRequest,
    presign::PresignPut,
    upload::{authorize_upload, Authorization},
};

/// `POST` handler for upload-init. Every failure is turned into a JSON error response.
pub async fn upload_init<S: PresignPut + ?Sized>(
    req: Request,
    signer: &S,
    cfg: &Config,
) -> Result<Response<Body>, Error> {
    match handle(&req, signer, cfg).await {
        Ok(auth) => create_response(StatusCode::OK, &auth),
        Err(e) => error_response(e),
    }
}

async fn handle<S: PresignPut + ?Sized>(
    req: &Request,
    signer: &S,
    cfg: &Config,
) -> Result<Authorization, UploadError> {
    if *req.method() != Method::POST {
        return Err(UploadError::MethodNotAllowed);
    }

    let upload = UploadRequest::from_body(req.body())?;

    authorize_upload(upload, signer, cfg).await
}

pub fn error_response(err: UploadError) -> Result<Response<Body>, Error> {
    let status = err.status_code();

    if status.is_server_error() {
        tracing::event!(tracing::Level::ERROR, "{:?}", err);
    } else {
        tracing::event!(tracing::Level::INFO, "rejected upload request: {}", err);
    }

    create_response(status, &json!({ "error": err.public_message() }))
}

pub fn create_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(serde_json::to_string(body)?.into())?)
}
