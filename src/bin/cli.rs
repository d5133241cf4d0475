//! taskplan command-line client.

#[tokio::main]
async fn main() -> miette::Result<()> {
    taskplan::cli::run().await?;
    Ok(())
}
