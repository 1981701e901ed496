use bytes::Bytes;
use futures::future::join_all;

use crate::apex::utils::ChatError;
use crate::api::contract::ChatApi;
use crate::chat::schemas::{Attachment, AttachmentKind};

pub struct FileSelection {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

pub fn attachment_kind_for_mime(mime_type: &str) -> AttachmentKind {
    if mime_type.starts_with("image/") {
        AttachmentKind::Image
    } else if mime_type.starts_with("video/") {
        AttachmentKind::Video
    } else if mime_type.starts_with("audio/") {
        AttachmentKind::Audio
    } else {
        AttachmentKind::File
    }
}

pub async fn upload_attachment(
    api: &dyn ChatApi,
    selection: FileSelection,
) -> Result<Attachment, ChatError> {
    let FileSelection {
        file_name,
        mime_type,
        data,
    } = selection;

    let kind = attachment_kind_for_mime(&mime_type);
    let file_size = data.len() as u64;

    let media = api
        .upload_media(&file_name, &mime_type, data)
        .await
        .map_err(|err| ChatError::Upload {
            file_name: file_name.clone(),
            reason: err.to_string(),
        })?;

    Ok(Attachment {
        kind,
        file_url: media.url,
        file_name,
        file_size,
        mime_type,
        thumbnail_url: media.thumbnail_url,
    })
}

// Each file is independent; one failure never aborts or rolls back its
// siblings. Outcomes come back in selection order.
pub async fn upload_batch(
    api: &dyn ChatApi,
    selections: Vec<FileSelection>,
) -> Vec<Result<Attachment, ChatError>> {
    join_all(
        selections
            .into_iter()
            .map(|selection| upload_attachment(api, selection)),
    )
    .await
}
