//! Session-scoped list of produced artifacts, most recent first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Recording,
    Snapshot,
}

impl ArtifactKind {
    pub fn badge(&self) -> &'static str {
        match self {
            ArtifactKind::Recording => "Recording",
            ArtifactKind::Snapshot => "Snapshot",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            ArtifactKind::Recording => "badge badge-recording",
            ArtifactKind::Snapshot => "badge badge-snapshot",
        }
    }

    pub fn thumbnail(&self) -> Thumbnail {
        match self {
            ArtifactKind::Recording => Thumbnail::MutedVideo,
            ArtifactKind::Snapshot => Thumbnail::Image,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Thumbnail {
    /// Muted, inline, non-autoplaying video.
    MutedVideo,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: u64,
    pub url: String,
    pub kind: ArtifactKind,
    /// Capture time, milliseconds since the Unix epoch.
    pub timestamp: f64,
}

/// Everything a view needs to draw one gallery row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryEntry {
    pub id: u64,
    pub url: String,
    pub kind: ArtifactKind,
    pub timestamp: f64,
    pub thumbnail: Thumbnail,
    pub badge: &'static str,
    pub badge_class: &'static str,
    pub download_name: String,
}

#[derive(Debug)]
pub struct Gallery {
    items: VecDeque<GalleryItem>,
    next_id: u64,
    recording_filename: String,
    snapshot_filename: String,
}

impl Gallery {
    pub fn new(recording_filename: impl Into<String>, snapshot_filename: impl Into<String>) -> Self {
        Self {
            items: VecDeque::new(),
            next_id: 1,
            recording_filename: recording_filename.into(),
            snapshot_filename: snapshot_filename.into(),
        }
    }

    pub fn add_item(&mut self, url: impl Into<String>, kind: ArtifactKind, timestamp: f64) -> &GalleryItem {
        let item = GalleryItem {
            id: self.next_id,
            url: url.into(),
            kind,
            timestamp,
        };
        self.next_id += 1;
        log::debug!("[Gallery] Added {} #{}", kind.badge(), item.id);
        self.items.push_front(item);
        &self.items[0]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&GalleryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items.iter()
    }

    pub fn download_name(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Recording => &self.recording_filename,
            ArtifactKind::Snapshot => &self.snapshot_filename,
        }
    }

    pub fn render(&self) -> Vec<GalleryEntry> {
        self.items
            .iter()
            .map(|item| GalleryEntry {
                id: item.id,
                url: item.url.clone(),
                kind: item.kind,
                timestamp: item.timestamp,
                thumbnail: item.kind.thumbnail(),
                badge: item.kind.badge(),
                badge_class: item.kind.badge_class(),
                download_name: self.download_name(item.kind).to_string(),
            })
            .collect()
    }
}
