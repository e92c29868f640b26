//! Analysis request built from the user's input

use crate::error::RequestError;

/// One photo plus an optional complaint, discarded after the remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    image: Vec<u8>,
    mime_type: String,
    complaint: Option<String>,
}

impl AnalysisRequest {
    /// Create a request for an image of a known MIME type.
    ///
    /// Only `image/*` types are accepted. A blank complaint counts as none.
    pub fn new(
        image: Vec<u8>,
        mime_type: impl Into<String>,
        complaint: Option<String>,
    ) -> Result<Self, RequestError> {
        let mime_type = mime_type.into().trim().to_ascii_lowercase();
        if !mime_type.starts_with("image/") || mime_type.len() == "image/".len() {
            return Err(RequestError::NotAnImage(mime_type));
        }
        if image.is_empty() {
            return Err(RequestError::EmptyImage);
        }

        let complaint = complaint
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            image,
            mime_type,
            complaint,
        })
    }

    /// Create a request, detecting the MIME type from the image bytes
    #[cfg(feature = "sniff")]
    pub fn sniffed(image: Vec<u8>, complaint: Option<String>) -> Result<Self, RequestError> {
        if image.is_empty() {
            return Err(RequestError::EmptyImage);
        }
        let mime_type = sniff_mime_type(&image).ok_or(RequestError::UnknownFormat)?;
        Self::new(image, mime_type, complaint)
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn complaint(&self) -> Option<&str> {
        self.complaint.as_deref()
    }
}

/// MIME type of the image encoded in `bytes`, from its magic number
#[cfg(feature = "sniff")]
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|format| format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "sniff")]
    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_rejects_non_image_mime() {
        let err = AnalysisRequest::new(vec![1, 2, 3], "application/pdf", None).unwrap_err();
        assert_eq!(err, RequestError::NotAnImage("application/pdf".to_string()));
        assert!(AnalysisRequest::new(vec![1], "image/", None).is_err());
    }

    #[test]
    fn test_rejects_empty_image() {
        let err = AnalysisRequest::new(Vec::new(), "image/png", None).unwrap_err();
        assert_eq!(err, RequestError::EmptyImage);
    }

    #[test]
    fn test_normalizes_mime_and_complaint() {
        let request =
            AnalysisRequest::new(vec![1], " Image/JPEG ", Some("  ".to_string())).unwrap();
        assert_eq!(request.mime_type(), "image/jpeg");
        assert_eq!(request.complaint(), None);

        let request =
            AnalysisRequest::new(vec![1], "image/png", Some(" gusi berdarah ".to_string()))
                .unwrap();
        assert_eq!(request.complaint(), Some("gusi berdarah"));
    }

    #[cfg(feature = "sniff")]
    #[test]
    fn test_sniffs_png() {
        let request = AnalysisRequest::sniffed(PNG_MAGIC.to_vec(), None).unwrap();
        assert_eq!(request.mime_type(), "image/png");
    }

    #[cfg(feature = "sniff")]
    #[test]
    fn test_sniff_rejects_unknown_bytes() {
        let err = AnalysisRequest::sniffed(b"not an image".to_vec(), None).unwrap_err();
        assert_eq!(err, RequestError::UnknownFormat);
    }
}
