//! Query a GameStream host: status, pairing state and application list.
//!
//! Usage: cargo run --example server_info -- <host-address>

use nvhttp::NvHttpClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "192.168.1.100".to_string());

    let mut client = NvHttpClient::new(&address)?;
    client.refresh_server_info().await?;

    println!("Host:            {}", client.address());
    println!("State:           {}", client.server_state());
    println!("Paired:          {}", client.paired());
    println!("Protocol major:  {}", client.server_major_version());
    println!("Current game id: {}", client.current_game());

    if client.paired() {
        println!("\nApplications:");
        for app in client.app_list().await? {
            let marker = if app.running { " (running)" } else { "" };
            println!("  {:>8}  {}{}", app.id, app.title, marker);
        }
    }

    Ok(())
}
