//! Image upload flow

use common::models::ImageMetadata;
use common::validation::check;

use crate::error::{ClientError, ClientResult};
use crate::transport::{ApiRequest, FilePart};

/// A file plus the metadata submitted with it
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file: FilePart,
    pub metadata: ImageMetadata,
}

impl ImageUpload {
    pub fn new(file: FilePart, metadata: ImageMetadata) -> Self {
        Self { file, metadata }
    }

    /// Schema checks run before anything is sent
    pub fn validate(&self) -> ClientResult<()> {
        check(&self.metadata).map_err(ClientError::Validation)?;
        if self.file.bytes.is_empty() {
            let mut errors = common::FieldErrors::new();
            errors.add("file", "Please choose a file to upload");
            return Err(ClientError::Validation(errors));
        }
        Ok(())
    }

    /// Multipart request for `POST /api/images/`
    pub fn into_request(self) -> ClientResult<ApiRequest> {
        self.validate()?;
        let fields = self
            .metadata
            .form_fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Ok(ApiRequest::post("/api/images/").multipart(fields, self.file))
    }
}
