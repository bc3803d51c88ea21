//! Personal site backend - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    if let Err(e) = personal_site::run().await {
        eprintln!("personal-site: {}", e);
        std::process::exit(1);
    }
}
