use super::drive_errors::StoreError;
use super::drive_models::{DocumentMetadata, MULTIPART_BOUNDARY};

/// Value for the `Content-Type` header of a multipart upload.
pub fn content_type() -> String {
    format!("multipart/related; boundary={}", MULTIPART_BOUNDARY)
}

/// Builds the two-part `multipart/related` body: metadata first, content second.
///
/// `content_json` must already be serialized JSON text.
pub fn encode_body(metadata: &DocumentMetadata, content_json: &str) -> Result<String, StoreError> {
    let metadata_json = serde_json::to_string(metadata)?;

    for (part, text) in [("metadata", metadata_json.as_str()), ("content", content_json)] {
        if text.contains(MULTIPART_BOUNDARY) {
            return Err(StoreError::InvalidArgument(format!(
                "{} part contains the multipart boundary `{}`",
                part, MULTIPART_BOUNDARY
            )));
        }
    }

    let boundary = MULTIPART_BOUNDARY;
    Ok(format!(
        "\r\n--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n\
         {metadata_json}\r\n\
         --{boundary}\r\nContent-Type: application/json\r\n\r\n\
         {content_json}\r\n\
         --{boundary}--"
    ))
}
