//! Launch an application by name on a paired GameStream host.
//!
//! Usage: cargo run --example launch_app -- <host-address> <app-name>

use nvhttp::{LaunchOptions, NvHttpClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let address = args.next().unwrap_or_else(|| "192.168.1.100".to_string());
    let app_name = args.next().unwrap_or_else(|| "Steam".to_string());

    let mut client = NvHttpClient::new(&address)?;
    client.refresh_server_info().await?;

    if !client.paired() {
        eprintln!("Not paired with {address}; pair first");
        std::process::exit(1);
    }

    let Some(app) = client.app_by_name(&app_name).await? else {
        eprintln!("No application named {app_name:?} on {address}");
        std::process::exit(1);
    };

    if client.current_game() == app.id {
        println!("{} is already streaming, resuming", app.title);
        client.resume_app("0000000000000000", 0).await?;
    } else {
        let options = LaunchOptions {
            mode: "1920x1080x60".to_string(),
            ..Default::default()
        };
        client.launch_app(app.id, &options).await?;
        println!("Launched {} (id {})", app.title, app.id);
    }

    Ok(())
}
