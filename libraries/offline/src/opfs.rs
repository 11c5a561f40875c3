use opfs::{
    DirectoryHandle as _, FileHandle as _, WritableFileStream as _,
    persistent::{self, DirectoryHandle},
};

use crate::{KeyValueStore, StoreError};

/// Stores every key as its own file in an OPFS directory. Survives storage pressure better than localStorage
/// and has no 5MB limit, which matters for large conferences.
#[derive(Debug)]
pub struct OpfsStore {
    directory: DirectoryHandle,
}

impl OpfsStore {
    pub async fn new(directory_name: &str) -> Result<Self, persistent::Error> {
        let root = persistent::app_specific_dir().await?;
        let directory = root
            .get_directory_handle_with_options(
                directory_name,
                &opfs::GetDirectoryHandleOptions { create: true },
            )
            .await?;
        Ok(Self { directory })
    }
}

/// Keys are uuids with a suffix in practice, but nothing stops a caller from using `/`.
fn file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{byte:02X}"));
        }
    }
    name.push_str(".json");
    name
}

/// A missing file is a cache miss. Anything else (security errors, a directory under that name) is not.
#[cfg(target_arch = "wasm32")]
fn is_not_found(error: &persistent::Error) -> bool {
    js_sys::Reflect::get(error, &"name".into())
        .ok()
        .and_then(|name| name.as_string())
        .is_some_and(|name| name == "NotFoundError")
}

#[cfg(not(target_arch = "wasm32"))]
fn is_not_found(error: &persistent::Error) -> bool {
    error.kind() == std::io::ErrorKind::NotFound
}

impl KeyValueStore for OpfsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let file_handle = match self
            .directory
            .get_file_handle_with_options(&file_name(key), &opfs::GetFileHandleOptions { create: false })
            .await
        {
            Ok(file_handle) => file_handle,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(StoreError::Backend(format!("opening {key}: {e:?}"))),
        };

        let bytes = file_handle
            .read()
            .await
            .map_err(|e| StoreError::Backend(format!("reading {key}: {e:?}")))?;

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StoreError::Backend(format!("{key} is not valid UTF-8: {e}")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut file_handle = self
            .directory
            .get_file_handle_with_options(&file_name(key), &opfs::GetFileHandleOptions { create: true })
            .await
            .map_err(|e| StoreError::Backend(format!("opening {key}: {e:?}")))?;

        let mut writable = file_handle
            .create_writable_with_options(&opfs::CreateWritableOptions {
                keep_existing_data: false,
            })
            .await
            .map_err(|e| StoreError::Backend(format!("opening {key} for writing: {e:?}")))?;

        writable
            .write_at_cursor_pos(value.as_bytes().to_vec())
            .await
            .map_err(|e| StoreError::Backend(format!("writing {key}: {e:?}")))?;

        writable
            .close()
            .await
            .map_err(|e| StoreError::Backend(format!("closing {key}: {e:?}")))
    }
}
