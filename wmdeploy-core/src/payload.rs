//! Upload payload construction.

use crate::types::{Metadata, RemotePath, UploadPayload, SCRIPT_KIND};

/// Combine file content, remote path and metadata into the request body.
///
/// Pure: no I/O, no failure modes.
pub fn build_payload(
    content: String,
    path: RemotePath,
    metadata: Metadata,
    language: &str,
) -> UploadPayload {
    UploadPayload {
        path,
        content,
        language: language.to_string(),
        summary: metadata.summary,
        description: metadata.description,
        schema: metadata.schema,
        kind: SCRIPT_KIND,
    }
}
