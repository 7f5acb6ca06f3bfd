use anyhow::Result;
use storage_backend::{KeyValueStorage, ObjectStoreBackend, StorageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let storage_path = std::env::var("STORAGE_PATH").unwrap_or_else(|_| "./data".to_string());
    println!("Using storage path: {storage_path}");

    let storage = ObjectStoreBackend::from_config(StorageConfig::local(storage_path))?;
    let key = "@GoMarketPlace:products";

    match storage.get(key).await? {
        Some(value) => println!("Current value of {key}: {value}"),
        None => println!("Nothing stored under {key} yet"),
    }

    let cart = r#"[{"id":"1","title":"Sneakers","image_url":"https://example.com/1.png","price":149.9,"quantity":1}]"#;
    storage.set(key, cart).await?;
    println!("Stored a one-item cart under {key}");

    if let Some(value) = storage.get(key).await? {
        println!("Read back: {value}");
    }

    Ok(())
}
