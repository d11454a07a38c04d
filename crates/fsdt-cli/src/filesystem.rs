//! Filesystem handle selection by URI scheme.

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use fsdt_core::types::{HDFS_SCHEME, SWEBHDFS_SCHEME, WEBHDFS_SCHEME};
use fsdt_core::{FsUri, NativeFileSystem, ServiceHandle};
use fsdt_webhdfs::WebHdfsFileSystem;

/// Open the handle matching the URI scheme.
///
/// `user_name` is only used by the REST-backed handles.
pub fn open(uri: &str, user_name: Option<&str>) -> Result<Arc<dyn ServiceHandle>> {
    let uri = FsUri::new(uri).context("Invalid filesystem URI")?;

    let scheme = uri.scheme().to_string();
    let handle: Arc<dyn ServiceHandle> = match scheme.as_str() {
        HDFS_SCHEME => Arc::new(NativeFileSystem::new(uri)?),
        WEBHDFS_SCHEME | SWEBHDFS_SCHEME => {
            let mut fs = WebHdfsFileSystem::new(uri)?;
            if let Some(user_name) = user_name {
                fs = fs.with_user_name(user_name);
            }
            Arc::new(fs)
        }
        other => bail!(
            "Unsupported filesystem scheme '{}'. Expected hdfs, webhdfs or swebhdfs.",
            other
        ),
    };

    Ok(handle)
}
