use personal_site::config::content_dir_from_env;
use personal_site::posts;
use personal_site::routes::blog::BlogIndexResponse;
use std::env;
use std::path::PathBuf;

fn main() {
    dotenvy::dotenv().ok();

    let root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(content_dir_from_env);

    if !root.is_dir() {
        eprintln!("Usage: cargo run --bin post-manifest [CONTENT_DIR]");
        eprintln!("No such directory: {}", root.display());
        std::process::exit(1);
    }

    let manifest = BlogIndexResponse {
        posts: posts::load_index(&root),
    };

    match serde_json::to_string_pretty(&manifest) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing manifest: {}", e);
            std::process::exit(1);
        }
    }
}
