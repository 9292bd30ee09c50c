use zagotovka::{initialize_environment, run_telegram_bot};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    initialize_environment();
    run_telegram_bot().await
}
