#[tokio::main]
async fn main() {
    if let Err(e) = trip_config_server::start_server().await {
        eprintln!("Server failed: {e}");
        std::process::exit(1);
    }
}
