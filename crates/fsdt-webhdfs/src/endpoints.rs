//! WebHDFS operation names and request/response types.

use serde::{Deserialize, Serialize};

/// REST prefix shared by every WebHDFS operation.
pub const PATH_PREFIX: &str = "/webhdfs/v1";

/// GETDELEGATIONTOKEN
pub const GET_DELEGATION_TOKEN: &str = "GETDELEGATIONTOKEN";

/// CANCELDELEGATIONTOKEN
pub const CANCEL_DELEGATION_TOKEN: &str = "CANCELDELEGATIONTOKEN";

/// Query for GETDELEGATIONTOKEN.
#[derive(Debug, Serialize)]
pub struct GetDelegationTokenQuery<'a> {
    pub op: &'static str,
    pub renewer: &'a str,
    pub service: &'a str,
    pub kind: &'a str,
    #[serde(rename = "user.name", skip_serializing_if = "Option::is_none")]
    pub user_name: Option<&'a str>,
}

/// Response from GETDELEGATIONTOKEN.
#[derive(Debug, Deserialize)]
pub struct GetDelegationTokenResponse {
    #[serde(rename = "Token")]
    pub token: UrlToken,
}

/// A token in its URL-safe encoding.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlToken {
    pub url_string: String,
}

/// Query for CANCELDELEGATIONTOKEN.
#[derive(Debug, Serialize)]
pub struct CancelDelegationTokenQuery<'a> {
    pub op: &'static str,
    pub token: &'a str,
    #[serde(rename = "user.name", skip_serializing_if = "Option::is_none")]
    pub user_name: Option<&'a str>,
}

/// Error body returned by the namenode.
#[derive(Debug, Deserialize)]
pub struct RemoteExceptionResponse {
    #[serde(rename = "RemoteException")]
    pub remote_exception: RemoteException,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteException {
    pub exception: Option<String>,
    pub message: Option<String>,
}
