use lambda_http::{run, service_fn, Error};
use shared::{config::Config, http::upload_init, presign::S3Presigner};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // CloudWatch adds the ingestion time.
        .without_time()
        .init();

    let cfg = Config::from_env();
    let signer = S3Presigner::new(&cfg).await;

    run(service_fn(|req| upload_init(req, &signer, &cfg))).await
}
