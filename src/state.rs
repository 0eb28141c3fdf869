use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::save_data;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::{Mutex, MutexGuard};

/// Handle shared by every request: where to save, and the single live copy
/// of the planner data.
#[derive(Clone)]
pub struct AppState {
    data_path: PathBuf,
    data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Locks the live data for a read-only view.
    pub async fn read(&self) -> MutexGuard<'_, AppData> {
        self.data.lock().await
    }

    /// Computes the next state from the current one, saves it, then swaps it in.
    ///
    /// The lock is held throughout, so commits never interleave. When `mutate`
    /// fails nothing is written and the live data is untouched.
    pub async fn commit<T, F>(&self, mutate: F) -> Result<T, AppError>
    where
        F: FnOnce(&AppData) -> Result<(AppData, T), AppError>,
    {
        let mut data = self.data.lock().await;
        let (next, output) = mutate(&data)?;
        save_data(&self.data_path, &next).await;
        *data = next;
        Ok(output)
    }
}
