/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */


use thiserror::Error;
use serde_json::Value;
use udfire_common::net::UdfireNetError;
use udfire_server::ApiError;

pub type Result<T> = std::result::Result<T, GeeError>;

#[derive(Error,Debug)]
pub enum GeeError {

    #[error("Invalid area code: {0}")]
    InvalidArea(String),

    #[error("Failed to initialize Earth Engine: {0}")]
    InitError(String),

    #[error("Earth Engine authentication failed: {0}")]
    AuthError(String),

    #[error("Earth Engine request failed ({0}): {1}")]
    RemoteError(u16,String),

    #[error("http error: {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("unexpected Earth Engine response: {0}")]
    UnexpectedResponse(String),
}

pub fn unexpected (msg: impl ToString)->GeeError {
    GeeError::UnexpectedResponse(msg.to_string())
}

impl From<gcp_auth::Error> for GeeError {
    fn from (e: gcp_auth::Error)->Self { GeeError::AuthError(e.to_string()) }
}

impl From<UdfireNetError> for GeeError {
    fn from (e: UdfireNetError)->Self {
        match e {
            UdfireNetError::HttpError(e) => GeeError::HttpError(e),
            UdfireNetError::StatusError(code,body) => GeeError::RemoteError( code, remote_error_message(&body)),
            UdfireNetError::NotFoundError(url) => GeeError::RemoteError( 404, format!("not found: {url}")),
            UdfireNetError::ParseError(msg) => GeeError::UnexpectedResponse(msg),
        }
    }
}

/// extract the message of a Google API error body (`{"error": {"code":.., "message":.., "status":..}}`),
/// falling back to the raw body text
pub fn remote_error_message (body: &str)->String {
    serde_json::from_str::<Value>(body).ok()
        .and_then( |v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else( || body.trim().to_string())
}

/// everything past query validation is reported as 500, including unknown area codes
impl From<GeeError> for ApiError {
    fn from (e: GeeError)->Self {
        ApiError::internal(e)
    }
}
