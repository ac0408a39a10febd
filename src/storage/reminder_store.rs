use std::path::{Path, PathBuf};

use crate::services::reminder::ReminderError;
use crate::utils::logging::{log_storage_error, log_storage_operation};

/// Flat JSON file listing the job names of every scheduled reminder.
#[derive(Debug, Clone)]
pub struct ReminderStore {
    path: PathBuf,
}

impl ReminderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored job names, or nothing if the file does not exist yet.
    pub async fn load(&self) -> Result<Vec<String>, ReminderError> {
        let target = self.path.display().to_string();

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log_storage_operation("LOAD", &target, Some("file not found, starting empty"));
                return Ok(Vec::new());
            }
            Err(e) => {
                log_storage_error("LOAD", &target, &e.to_string());
                return Err(e.into());
            }
        };

        let names: Vec<String> = serde_json::from_str(&content).map_err(|e| {
            log_storage_error("LOAD", &target, &e.to_string());
            ReminderError::from(e)
        })?;

        log_storage_operation("LOAD", &target, Some(&format!("{} entries", names.len())));
        Ok(names)
    }

    /// Replaces the file with `names`, going through a sibling temp file.
    pub async fn save(&self, names: &[String]) -> Result<(), ReminderError> {
        let target = self.path.display().to_string();
        let json = serde_json::to_string(names)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.temp_path();
        let result = async {
            tokio::fs::write(&tmp_path, json.as_bytes()).await?;
            tokio::fs::rename(&tmp_path, &self.path).await
        }
        .await;

        if let Err(e) = result {
            log_storage_error("SAVE", &target, &e.to_string());
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        log_storage_operation("SAVE", &target, Some(&format!("{} entries", names.len())));
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "reminders.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
