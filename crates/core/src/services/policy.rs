//! Attachment acceptance policy.
//!
//! Screening is a pure function over the currently accepted list and a
//! batch of picker candidates. Acceptance is all-or-nothing per candidate
//! and already-accepted files always survive a bad batch.

use std::collections::HashSet;

use youmatter_types::FileCandidate;

/// Maximum number of attachments per complaint.
pub const MAX_FILES_PER_COMPLAINT: usize = 5;

/// Maximum size of a single attachment (5 MiB).
pub const MAX_FILE_BYTES: i64 = 5 * 1024 * 1024;

/// Maximum combined size of all attachments (20 MiB).
pub const MAX_TOTAL_BYTES: i64 = 20 * 1024 * 1024;

/// Extensions a complaint may carry.
const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "txt", "rtf", "jpg", "jpeg", "png", "gif",
    "bmp", "webp", "heic", "heif",
];

/// Image subset of the allow-list; gates `image/*` MIME acceptance.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "heic", "heif"];

/// Executable and script extensions, rejected in any filename segment so
/// `report.exe.pdf` does not slip through.
const BLOCKED_EXTENSIONS: &[&str] = &[
    "exe", "msi", "bat", "cmd", "com", "scr", "sh", "bash", "zsh", "ksh", "csh", "ps1", "psm1",
    "jar", "js", "mjs", "cpl", "vbs", "hta", "dll", "so", "apk", "ipa", "pkg", "dmg", "app", "iso",
    "img",
];

/// Declared MIME prefixes that are never acceptable.
const BLOCKED_MIME_PREFIXES: &[&str] = &[
    "application/x-ms",
    "application/x-dosexec",
    "application/x-executable",
    "application/java-archive",
    "text/javascript",
    "application/javascript",
    "application/x-sh",
    "application/x-bat",
    "application/vnd.android.package-archive",
    "application/x-ms-installer",
    "application/x-apple-diskimage",
];

/// Non-image MIME types a complaint may carry.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
    "application/rtf",
    "text/rtf",
];

/// Result of screening one picker batch.
#[derive(Debug, Clone, Default)]
pub struct ScreenOutcome {
    /// The accepted list after the batch; always a prefix-extension of the
    /// input list.
    pub accepted: Vec<FileCandidate>,
    /// Deduplicated rejection messages, in first-seen order.
    pub errors: Vec<String>,
}

/// Screen a batch of candidates against the currently accepted list.
#[must_use]
pub fn screen_files(accepted: &[FileCandidate], batch: &[FileCandidate]) -> ScreenOutcome {
    let mut next = accepted.to_vec();
    let mut errors: Vec<String> = Vec::new();
    let mut seen: HashSet<(String, i64, Option<i64>)> =
        next.iter().map(FileCandidate::dedup_key).collect();
    let mut total: i64 = next.iter().map(|f| f.size).sum();

    for candidate in batch {
        if seen.contains(&candidate.dedup_key()) {
            // Re-selecting an already-accepted file is not an error.
            continue;
        }

        if let Err(message) = check_candidate(candidate) {
            push_unique(&mut errors, message);
            continue;
        }

        if next.len() >= MAX_FILES_PER_COMPLAINT {
            push_unique(
                &mut errors,
                format!("You can attach up to {MAX_FILES_PER_COMPLAINT} files per complaint"),
            );
            continue;
        }

        if candidate.size > MAX_FILE_BYTES {
            push_unique(
                &mut errors,
                format!("{} exceeds the 5 MB per-file limit.", candidate.name),
            );
            continue;
        }

        if total + candidate.size > MAX_TOTAL_BYTES {
            push_unique(
                &mut errors,
                "Attachments cannot exceed 20 MB in total.".to_string(),
            );
            continue;
        }

        seen.insert(candidate.dedup_key());
        total += candidate.size;
        next.push(candidate.clone());
    }

    ScreenOutcome {
        accepted: next,
        errors,
    }
}

/// Per-candidate checks that do not depend on the accepted list.
fn check_candidate(candidate: &FileCandidate) -> Result<(), String> {
    if candidate.size <= 0 {
        return Err(format!(
            "{} is empty and cannot be attached.",
            candidate.name
        ));
    }

    let name = candidate.name.to_lowercase();
    let mut segments = name.split('.');
    // The first segment is the base name, not an extension.
    segments.next();
    let extensions: Vec<&str> = segments.collect();

    if extensions
        .iter()
        .any(|segment| BLOCKED_EXTENSIONS.contains(segment))
    {
        return Err(type_error(&candidate.name));
    }

    let mime = candidate
        .mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if BLOCKED_MIME_PREFIXES
        .iter()
        .any(|prefix| mime.starts_with(prefix))
    {
        return Err(type_error(&candidate.name));
    }

    let Some(extension) = extensions.last().copied() else {
        return Err(type_error(&candidate.name));
    };
    if !ALLOWED_EXTENSIONS.contains(&extension) {
        return Err(type_error(&candidate.name));
    }

    if !mime.is_empty() && !mime_allowed(&mime, extension) {
        return Err(type_error(&candidate.name));
    }

    Ok(())
}

fn mime_allowed(mime: &str, extension: &str) -> bool {
    if ALLOWED_MIME_TYPES.contains(&mime) {
        return true;
    }
    if mime.starts_with("image/") {
        return IMAGE_EXTENSIONS.contains(&extension);
    }
    false
}

fn type_error(name: &str) -> String {
    format!("{name} is not an accepted file type")
}

fn push_unique(errors: &mut Vec<String>, message: String) {
    if !errors.contains(&message) {
        errors.push(message);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn file(name: &str, size: i64, mime: &str) -> FileCandidate {
        FileCandidate {
            name: name.to_string(),
            size,
            mime_type: mime.to_string(),
            last_modified: Some(1_700_000_000_000),
        }
    }

    const MB: i64 = 1024 * 1024;

    #[test]
    fn test_accepts_document_and_rejects_masked_executable() {
        let outcome = screen_files(
            &[],
            &[
                file("notes.pdf", MB, "application/pdf"),
                file("script.exe.pdf", 1024, "application/pdf"),
            ],
        );
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].name, "notes.pdf");
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("not an accepted file type"));
    }

    #[test]
    fn test_count_cap_rejects_sixth_file() {
        let batch: Vec<FileCandidate> = (0..6)
            .map(|i| file(&format!("photo{i}.jpg"), MB, "image/jpeg"))
            .collect();
        let outcome = screen_files(&[], &batch);
        assert_eq!(outcome.accepted.len(), 5);
        assert_eq!(
            outcome.errors,
            vec!["You can attach up to 5 files per complaint".to_string()]
        );
    }

    #[test]
    fn test_prefix_extension_law() {
        let accepted = screen_files(&[], &[file("a.pdf", MB, "application/pdf")]).accepted;
        let outcome = screen_files(
            &accepted,
            &[
                file("evil.exe", 1024, "application/x-dosexec"),
                file("b.png", MB, "image/png"),
            ],
        );
        assert_eq!(&outcome.accepted[..accepted.len()], &accepted[..]);
        assert_eq!(outcome.accepted.len(), 2);
    }

    #[test]
    fn test_per_file_size_cap() {
        let outcome = screen_files(&[], &[file("big.pdf", 6 * MB, "application/pdf")]);
        assert!(outcome.accepted.is_empty());
        assert!(outcome.errors[0].contains("5 MB"));
    }

    #[test]
    fn test_total_size_cap() {
        let accepted = screen_files(
            &[],
            &[
                file("a.pdf", 5 * MB, "application/pdf"),
                file("b.pdf", 5 * MB, "application/pdf"),
                file("c.pdf", 5 * MB, "application/pdf"),
                file("d.pdf", 4 * MB, "application/pdf"),
            ],
        )
        .accepted;
        assert_eq!(accepted.len(), 4);

        let outcome = screen_files(&accepted, &[file("e.pdf", 2 * MB, "application/pdf")]);
        assert_eq!(outcome.accepted.len(), 4);
        assert_eq!(
            outcome.errors,
            vec!["Attachments cannot exceed 20 MB in total.".to_string()]
        );
    }

    #[test]
    fn test_blocked_mime_prefix() {
        let outcome = screen_files(&[], &[file("macro.docx", MB, "application/x-ms-word")]);
        assert!(outcome.accepted.is_empty());
        assert!(outcome.errors[0].contains("not an accepted file type"));
    }

    #[test]
    fn test_image_mime_requires_image_extension() {
        let outcome = screen_files(&[], &[file("photo.txt", MB, "image/png")]);
        assert!(outcome.accepted.is_empty());

        let outcome = screen_files(&[], &[file("photo.webp", MB, "image/webp")]);
        assert_eq!(outcome.accepted.len(), 1);
    }

    #[test]
    fn test_empty_file_rejected() {
        let outcome = screen_files(&[], &[file("empty.pdf", 0, "application/pdf")]);
        assert!(outcome.accepted.is_empty());
        assert!(outcome.errors[0].contains("empty"));
    }

    #[test]
    fn test_missing_extension_rejected() {
        let outcome = screen_files(&[], &[file("README", MB, "text/plain")]);
        assert!(outcome.accepted.is_empty());
    }

    #[test]
    fn test_duplicate_candidate_is_silently_skipped() {
        let first = screen_files(&[], &[file("a.pdf", MB, "application/pdf")]);
        let again = screen_files(&first.accepted, &[file("a.pdf", MB, "application/pdf")]);
        assert_eq!(again.accepted.len(), 1);
        assert!(again.errors.is_empty());
    }

    #[test]
    fn test_same_name_different_size_is_not_a_duplicate() {
        let first = screen_files(&[], &[file("a.pdf", MB, "application/pdf")]);
        let again = screen_files(&first.accepted, &[file("a.pdf", 2 * MB, "application/pdf")]);
        assert_eq!(again.accepted.len(), 2);
    }

    #[test]
    fn test_error_messages_are_deduplicated() {
        let outcome = screen_files(
            &[],
            &[
                file("one.exe", 1024, ""),
                file("two.exe", 1024, ""),
                file("one.exe", 2048, ""),
            ],
        );
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn test_empty_mime_falls_back_to_extension() {
        let outcome = screen_files(&[], &[file("photo.jpeg", MB, "")]);
        assert_eq!(outcome.accepted.len(), 1);
    }

    #[test]
    fn test_accepted_list_survives_fully_bad_batch() {
        let accepted = screen_files(&[], &[file("a.pdf", MB, "application/pdf")]).accepted;
        let outcome = screen_files(
            &accepted,
            &[file("x.bat", 10, ""), file("y.vbs", 10, "")],
        );
        assert_eq!(outcome.accepted, accepted);
        assert_eq!(outcome.errors.len(), 2);
    }
}
