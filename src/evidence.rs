//! Evidence photo staging
//!
//! Photos of returned products are staged per product before the return is
//! submitted. The staging area is owned by the submission workflow and cleared
//! once it settles; nothing is kept across sessions.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;
use crate::{Result, ReturnsError};

#[derive(Clone, Debug, PartialEq)]
pub struct EvidenceImage {
    pub id: Uuid,
    pub product_id: i64,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub staged_at: DateTime<Utc>,
}

/// At most one image per product; staging again replaces the previous one.
#[derive(Clone, Debug, Default)]
pub struct EvidenceStaging {
    images: HashMap<i64, EvidenceImage>,
}

impl EvidenceStaging {
    pub fn new() -> Self { Self::default() }

    pub fn stage(&mut self, product_id: i64, file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> &EvidenceImage {
        let image = EvidenceImage {
            id: Uuid::new_v4(),
            product_id,
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
            staged_at: Utc::now(),
        };
        if let Some(previous) = self.images.insert(product_id, image) {
            tracing::debug!(product_id, replaced = %previous.id, "Replaced staged evidence");
        }
        &self.images[&product_id]
    }

    /// Reads `path` and stages it for `product_id`; the content type is guessed from the extension.
    pub async fn stage_file(&mut self, product_id: i64, path: impl AsRef<Path>) -> Result<&EvidenceImage> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ReturnsError::Evidence(format!("Failed to read {}: {}", path.display(), e)))?;
        if bytes.is_empty() {
            return Err(ReturnsError::Evidence(format!("{} is empty", path.display())));
        }
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("evidence.jpg").to_string();
        let content_type = mime_guess::from_path(path).first_or_octet_stream().essence_str().to_string();
        Ok(self.stage(product_id, file_name, content_type, bytes))
    }

    pub fn get(&self, product_id: i64) -> Option<&EvidenceImage> { self.images.get(&product_id) }
    pub fn remove(&mut self, product_id: i64) -> Option<EvidenceImage> { self.images.remove(&product_id) }

    /// Staged product ids, ascending.
    pub fn product_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.images.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize { self.images.len() }
    pub fn is_empty(&self) -> bool { self.images.is_empty() }

    pub fn clear(&mut self) {
        if !self.images.is_empty() {
            tracing::debug!(count = self.images.len(), "Clearing staged evidence");
        }
        self.images.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_stage_wins() {
        let mut staging = EvidenceStaging::new();
        staging.stage(7, "a.jpg", "image/jpeg", vec![1, 2]);
        let second = staging.stage(7, "b.png", "image/png", vec![3]).id;
        assert_eq!(staging.len(), 1);
        let image = staging.get(7).unwrap();
        assert_eq!(image.id, second);
        assert_eq!(image.file_name, "b.png");
        assert_eq!(image.bytes, vec![3]);
    }

    #[test]
    fn test_clear() {
        let mut staging = EvidenceStaging::new();
        staging.stage(1, "a.jpg", "image/jpeg", vec![1]);
        staging.stage(2, "b.jpg", "image/jpeg", vec![2]);
        assert_eq!(staging.product_ids(), vec![1, 2]);
        assert!(staging.remove(1).is_some());
        staging.clear();
        assert!(staging.is_empty());
    }

    #[tokio::test]
    async fn test_stage_file() {
        let path = std::env::temp_dir().join(format!("opensase-evidence-{}.png", Uuid::new_v4()));
        tokio::fs::write(&path, [0x89, b'P', b'N', b'G']).await.unwrap();
        let mut staging = EvidenceStaging::new();
        let image = staging.stage_file(5, &path).await.unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes.len(), 4);
        tokio::fs::remove_file(&path).await.unwrap();

        let missing = staging.stage_file(6, &path).await;
        assert!(matches!(missing, Err(ReturnsError::Evidence(_))));
    }
}
