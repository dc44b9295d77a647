#[tokio::main]
async fn main() -> std::io::Result<()> {
    pneumocheck::run().await
}
