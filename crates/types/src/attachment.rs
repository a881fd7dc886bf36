//! Attachment descriptors and transient upload handles.

use serde::{Deserialize, Serialize};

/// Attachment metadata as carried in complaint payloads and records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    /// Original filename.
    pub name: String,
    /// Declared size in bytes.
    #[serde(default)]
    pub size: i64,
    /// Declared MIME type.
    #[serde(default, rename = "type")]
    pub mime_type: Option<String>,
    /// Server-side stored path or URL, present once uploaded.
    #[serde(default, alias = "path", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A file offered to the attachment picker.
///
/// Carries only what the policy engine needs to decide acceptance; the
/// bytes themselves stay in the owning [`AttachmentUpload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Original filename.
    pub name: String,
    /// Size in bytes as reported by the picker.
    pub size: i64,
    /// Declared MIME type; may be empty when the picker has none.
    pub mime_type: String,
    /// Last-modified timestamp in milliseconds, when known.
    pub last_modified: Option<i64>,
}

impl FileCandidate {
    /// The metadata sent with the complaint payload.
    #[must_use]
    pub fn meta(&self) -> AttachmentMeta {
        AttachmentMeta {
            name: self.name.clone(),
            size: self.size,
            mime_type: if self.mime_type.is_empty() {
                None
            } else {
                Some(self.mime_type.clone())
            },
            url: None,
        }
    }

    /// Identity used for silent deduplication across picker batches.
    #[must_use]
    pub fn dedup_key(&self) -> (String, i64, Option<i64>) {
        (self.name.clone(), self.size, self.last_modified)
    }
}

/// An attachment as held by the client between selection and upload.
///
/// File bytes are never persisted; they exist only while a submission is
/// in flight, and records fetched back from the server are metadata only.
#[derive(Debug, Clone)]
pub enum AttachmentUpload {
    /// Descriptor only, e.g. an attachment on a fetched complaint.
    MetadataOnly(AttachmentMeta),
    /// A locally selected file awaiting upload.
    WithBytes {
        meta: AttachmentMeta,
        bytes: Vec<u8>,
    },
}

impl AttachmentUpload {
    /// The descriptor, regardless of whether bytes are held.
    #[must_use]
    pub const fn meta(&self) -> &AttachmentMeta {
        match self {
            Self::MetadataOnly(meta) | Self::WithBytes { meta, .. } => meta,
        }
    }

    /// Drop the transient bytes, keeping the descriptor.
    #[must_use]
    pub fn into_meta(self) -> AttachmentMeta {
        match self {
            Self::MetadataOnly(meta) | Self::WithBytes { meta, .. } => meta,
        }
    }
}
