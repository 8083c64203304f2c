use crate::models::AppData;
use crate::store::StoreError;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Reads the data file, starting empty when it does not exist yet.
pub async fn load_data(path: &Path) -> Result<AppData, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => {
            let data: AppData = serde_json::from_slice(&bytes)?;
            info!(
                users = data.users.len(),
                walks = data.walks.len(),
                "loaded data file {}",
                path.display()
            );
            Ok(data)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no data file at {}, starting empty", path.display());
            Ok(AppData::default())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
