//! Modality classification (SPEC_FULL.md §C): classify `RawInput` into a
//! `ModalityType` and, for non-text inputs, produce a lightweight
//! `FileHandle` rather than reading the file into memory.

/// The kind of input Gate-In is ingesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalityType {
    Text,
    Audio,
    Image,
    Video,
    Document,
    Unknown,
}

/// A raw input to `process()`: inline content, a file path, and/or a
/// declared MIME type. At least one of `content`/`file_path` is expected to
/// be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    pub content: Option<String>,
    pub file_path: Option<String>,
    pub mime_type: Option<String>,
}

impl RawInput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            file_path: None,
            mime_type: None,
        }
    }
}

/// A lightweight reference to a non-text input: path, modality, and size —
/// heavy-media decoding is a collaborator's job, not the kernel's.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    pub path: String,
    pub modality: ModalityType,
    pub size_bytes: Option<u64>,
}

fn extension_of(path: &str) -> Option<String> {
    path.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

fn modality_from_extension(ext: &str) -> ModalityType {
    match ext {
        "mp3" | "wav" | "flac" | "ogg" | "m4a" => ModalityType::Audio,
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" => ModalityType::Image,
        "mp4" | "mov" | "avi" | "mkv" | "webm" => ModalityType::Video,
        "pdf" | "doc" | "docx" | "md" | "txt" | "csv" | "json" => ModalityType::Document,
        _ => ModalityType::Unknown,
    }
}

fn modality_from_mime(mime: &str) -> Option<ModalityType> {
    let prefix = mime.split('/').next()?;
    Some(match prefix {
        "audio" => ModalityType::Audio,
        "image" => ModalityType::Image,
        "video" => ModalityType::Video,
        "text" | "application" => ModalityType::Document,
        _ => ModalityType::Unknown,
    })
}

/// Classify `input`, preferring an explicit MIME type, then the file
/// extension, falling back to `Text` when only inline `content` is present.
pub fn classify(input: &RawInput) -> (ModalityType, Option<FileHandle>) {
    if let Some(mime) = input.mime_type.as_deref() {
        if let Some(modality) = modality_from_mime(mime) {
            if let Some(path) = &input.file_path {
                return (
                    modality,
                    Some(FileHandle {
                        path: path.clone(),
                        modality,
                        size_bytes: None,
                    }),
                );
            }
            if modality == ModalityType::Document && input.content.is_some() {
                return (ModalityType::Text, None);
            }
            return (modality, None);
        }
    }

    if let Some(path) = &input.file_path {
        let modality = extension_of(path)
            .map(|ext| modality_from_extension(&ext))
            .unwrap_or(ModalityType::Unknown);
        return (
            modality,
            Some(FileHandle {
                path: path.clone(),
                modality,
                size_bytes: None,
            }),
        );
    }

    if input.content.is_some() {
        return (ModalityType::Text, None);
    }

    (ModalityType::Unknown, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_text_classifies_as_text() {
        let input = RawInput::text("How do I reset my password?");
        let (modality, handle) = classify(&input);
        assert_eq!(modality, ModalityType::Text);
        assert!(handle.is_none());
    }

    #[test]
    fn file_extension_drives_modality() {
        let input = RawInput {
            content: None,
            file_path: Some("/tmp/report.pdf".to_string()),
            mime_type: None,
        };
        let (modality, handle) = classify(&input);
        assert_eq!(modality, ModalityType::Document);
        assert_eq!(handle.unwrap().path, "/tmp/report.pdf");
    }

    #[test]
    fn mime_type_overrides_extension_guess() {
        let input = RawInput {
            content: None,
            file_path: Some("/tmp/clip.bin".to_string()),
            mime_type: Some("video/mp4".to_string()),
        };
        let (modality, _) = classify(&input);
        assert_eq!(modality, ModalityType::Video);
    }
}
