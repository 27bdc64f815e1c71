//! Uploads a file as multipart form data and prints upload progress.
//!
//! ```sh
//! RUST_LOG=api_client=debug cargo run -p api-client --example upload_file -- \
//!     https://httpbin.org/post ./photo.png
//! ```
//!
//! Set `API_TOKEN` to send `Authorization: Token <value>`.

use std::path::Path;
use std::sync::Arc;

use api_client::{
    ApiClient, Endpoint, HttpMethod, ImageMimeType, MultipartFormData, TracingLogger,
    UploadProgress,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(target), Some(file)) = (args.next(), args.next()) else {
        eprintln!("usage: upload_file <url> <file>");
        std::process::exit(2);
    };

    let path = Path::new(&file);
    let data = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin");
    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageMimeType::from_extension)
        .map(String::from)
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let form = MultipartFormData::new("api-client-boundary", data, file_name, mime_type)
        .parameter("source", "upload_file example");
    let endpoint = Endpoint::builder()
        .base_url(target)
        .method(HttpMethod::Post)
        .multipart(&form)
        .build();

    let mut builder = ApiClient::builder().logger(TracingLogger::new("upload"));
    if let Ok(token) = std::env::var("API_TOKEN") {
        builder = builder.token(token);
    }
    let client = builder.build()?;

    let progress = Arc::new(UploadProgress::new(|fraction| {
        println!("uploaded {:>5.1}%", fraction * 100.0);
    }));

    match client.request_with_progress(&endpoint, Some(progress)).await? {
        Some(body) => println!("{}", String::from_utf8_lossy(&body)),
        None => println!("(empty response)"),
    }

    Ok(())
}
