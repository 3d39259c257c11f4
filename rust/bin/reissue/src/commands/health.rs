use anyhow::Result;
use reissue_client::ReissueApi;

pub async fn health(server: &str) -> Result<()> {
    let client = super::client(server)?;
    match client.health().await {
        Ok(()) => {
            println!("{} is up.", client.base_url());
            Ok(())
        }
        Err(e) => anyhow::bail!("{} is not reachable: {}", client.base_url(), e),
    }
}
