use crate::domain::model::CartDocument;
use crate::domain::ports::CartRepository;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Cart document store: one JSON file per user under a base directory.
/// Whole-document writes, last write wins.
#[derive(Debug, Clone)]
pub struct JsonCartStore {
    base_path: String,
}

impl JsonCartStore {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn document_path(&self, user_id: &str) -> PathBuf {
        // 使用者 id 來自認證層，仍避免寫出基底目錄之外
        let file_name: String = user_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        Path::new(&self.base_path).join(format!("{}.json", file_name))
    }
}

impl CartRepository for JsonCartStore {
    async fn load(&self, user_id: &str) -> Result<Option<CartDocument>> {
        let path = self.document_path(user_id);
        if !path.exists() {
            // 沒有檔案代表購物車尚未建立
            return Ok(None);
        }
        let data = fs::read(&path)?;
        let document = serde_json::from_slice(&data)?;
        Ok(Some(document))
    }

    async fn save(&self, document: &CartDocument) -> Result<()> {
        let path = self.document_path(&document.user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(document)?;
        fs::write(&path, data)?;
        tracing::debug!("Saved cart document for user {}", document.user_id);
        Ok(())
    }
}
