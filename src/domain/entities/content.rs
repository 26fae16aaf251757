use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Description,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Image => write!(f, "image"),
            ContentKind::Description => write!(f, "description"),
        }
    }
}

/// One block of a project's detail page, addressable by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub content: String,
}

impl ContentEntry {
    pub fn image(id: impl Into<String>, blob: impl Into<String>) -> Self {
        ContentEntry {
            id: id.into(),
            kind: ContentKind::Image,
            content: blob.into(),
        }
    }

    pub fn description(id: impl Into<String>, text: impl Into<String>) -> Self {
        ContentEntry {
            id: id.into(),
            kind: ContentKind::Description,
            content: text.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == ContentKind::Image
    }
}
