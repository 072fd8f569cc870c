use std::path::Path;

/// Container formats the decode boundary accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
}

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

impl ImageKind {
    pub const ALL: [Self; 5] = [Self::Jpeg, Self::Png, Self::Gif, Self::Bmp, Self::WebP];

    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::WebP => "webp",
        }
    }

    fn matches_extension(self, lower: &str) -> bool {
        match self {
            Self::Jpeg => matches!(lower, "jpg" | "jpeg"),
            Self::Png => lower == "png",
            Self::Gif => lower == "gif",
            Self::Bmp => lower == "bmp",
            Self::WebP => lower == "webp",
        }
    }

    fn matches_signature(self, data: &[u8]) -> bool {
        match self {
            Self::Jpeg => data.starts_with(&[0xFF, 0xD8]),
            Self::Png => data.starts_with(&PNG_SIGNATURE),
            Self::Gif => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
            Self::Bmp => data.starts_with(b"BM"),
            Self::WebP => data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP",
        }
    }
}

/// Identify a container from magic bytes alone. Never decodes, never fails;
/// unrecognized input is simply `None`.
pub fn sniff_signature(data: &[u8]) -> Option<ImageKind> {
    if data.len() < 2 {
        return None;
    }
    ImageKind::ALL.into_iter().find(|kind| kind.matches_signature(data))
}

/// True when the filename's suffix (case-insensitive) names a supported
/// container. `image.png.txt` does not count; only the final extension does.
pub fn has_image_extension(filename: &str) -> bool {
    let Some(ext) = Path::new(filename).extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let lower = ext.to_ascii_lowercase();
    ImageKind::ALL.into_iter().any(|kind| kind.matches_extension(&lower))
}

/// Cheap image/not-image classification. Either signal is sufficient: a known
/// file extension or a known magic-byte signature.
pub fn classify(data: &[u8], filename: &str) -> bool {
    has_image_extension(filename) || sniff_signature(data).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_table_matches_supported_containers() {
        let cases = [
            ("test.jpg", true),
            ("test.jpeg", true),
            ("test.png", true),
            ("test.gif", true),
            ("test.bmp", true),
            ("test.webp", true),
            ("test.JPG", true),
            ("photo.PnG", true),
            ("test.txt", false),
            ("test.pdf", false),
            ("test", false),
            ("image.png.txt", false),
            ("", false),
        ];
        for (filename, expected) in cases {
            assert_eq!(
                has_image_extension(filename),
                expected,
                "filename={filename:?}"
            );
        }
    }

    #[test]
    fn signature_table_matches_supported_containers() {
        let cases: [(&str, &[u8], Option<ImageKind>); 9] = [
            ("jpeg", &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], Some(ImageKind::Jpeg)),
            (
                "png",
                &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
                Some(ImageKind::Png),
            ),
            ("gif87a", b"GIF87a", Some(ImageKind::Gif)),
            ("gif89a", b"GIF89a", Some(ImageKind::Gif)),
            ("bmp", &[0x42, 0x4D, 0x36, 0x48], Some(ImageKind::Bmp)),
            ("webp", b"RIFF\x24\x08\x00\x00WEBP", Some(ImageKind::WebP)),
            ("riff-not-webp", b"RIFF\x24\x08\x00\x00WAVE", None),
            ("text", b"Hello, world!", None),
            ("empty", b"", None),
        ];
        for (name, data, expected) in cases {
            assert_eq!(sniff_signature(data), expected, "case={name}");
        }
    }

    #[test]
    fn buffers_shorter_than_two_bytes_never_match() {
        assert_eq!(sniff_signature(&[]), None);
        assert_eq!(sniff_signature(&[0x42]), None);
        assert!(!classify(&[0x42], "mystery.bin"));
    }

    #[test]
    fn signature_match_is_independent_of_buffer_length() {
        let mut png = PNG_SIGNATURE.to_vec();
        assert_eq!(sniff_signature(&png), Some(ImageKind::Png));
        png.extend(std::iter::repeat(0_u8).take(4096));
        assert_eq!(sniff_signature(&png), Some(ImageKind::Png));
    }

    #[test]
    fn either_signal_is_sufficient() {
        // Extension alone.
        assert!(classify(b"not image bytes", "fake.jpg"));
        // Signature alone.
        assert!(classify(&[0xFF, 0xD8, 0xFF], "download.bin"));
        // Neither.
        assert!(!classify(b"This is just text content", "notes.txt"));
    }

    #[test]
    fn labels_are_stable() {
        let labels: Vec<&str> = ImageKind::ALL.into_iter().map(ImageKind::label).collect();
        assert_eq!(labels, vec!["jpeg", "png", "gif", "bmp", "webp"]);
    }
}
