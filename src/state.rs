use crate::clock::Clock;
use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use chrono::{DateTime, Utc};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn with_clock(data_path: PathBuf, data: AppData, clock: Arc<dyn Clock>) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// One consistent view of the store for the duration of a read.
    pub async fn read(&self) -> MutexGuard<'_, AppData> {
        self.data.lock().await
    }

    /// Applies `change` to a copy of the data, persists the copy and only then
    /// swaps it in, so a failed write leaves memory untouched.
    pub async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut AppData) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut data = self.data.lock().await;
        let mut draft = data.clone();
        let outcome = change(&mut draft)?;
        persist_data(&self.data_path, &draft).await?;
        *data = draft;
        Ok(outcome)
    }
}
