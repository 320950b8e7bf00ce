//! Attachment Endpoints
//!
//! Files live under `/tasks/:id/attachments`; names are path-encoded.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use kanban_dnd::{ApiError, ApiResult};

use super::{checked, send_unit, HttpApi};

/// Characters kept verbatim in a file name segment
const FILE_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-').remove(b'_');

pub(super) fn path(task_id: u32, file_name: Option<&str>) -> String {
    match file_name {
        Some(name) => format!(
            "/tasks/{}/attachments/{}",
            task_id,
            utf8_percent_encode(name, FILE_NAME)
        ),
        None => format!("/tasks/{}/attachments", task_id),
    }
}

/// Multipart upload of one dropped file. Returns the stored file name.
pub async fn upload_attachment(api: &HttpApi, task_id: u32, file: &web_sys::File) -> ApiResult<String> {
    let js_err = |e: wasm_bindgen::JsValue| ApiError::Network(format!("{:?}", e));
    let form = web_sys::FormData::new().map_err(js_err)?;
    let name = file.name();
    form.append_with_blob_and_filename("file", file, &name).map_err(js_err)?;

    let request = api
        .post(&path(task_id, None))
        .body(form)
        .map_err(|e| ApiError::Network(e.to_string()))?;
    checked(request.send().await).await?;
    log::info!("[API] uploaded {} to task {}", name, task_id);
    Ok(name)
}

pub async fn delete(api: &HttpApi, task_id: u32, file_name: &str) -> ApiResult<()> {
    send_unit::<()>(api.delete(&path(task_id, Some(file_name))), None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_are_encoded() {
        assert_eq!(path(3, None), "/tasks/3/attachments");
        assert_eq!(path(3, Some("notes.txt")), "/tasks/3/attachments/notes.txt");
        assert_eq!(
            path(3, Some("my report/v2.pdf")),
            "/tasks/3/attachments/my%20report%2Fv2.pdf"
        );
    }
}
