use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    browse_cli::main_entry().await
}
