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


use axum::{extract::rejection::QueryRejection, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub type UdfireServerResult<T> = std::result::Result<T, UdfireServerError>;

#[derive(Error,Debug)]
pub enum UdfireServerError {

    #[error("IO error: {0}")]
    IoError( #[from] std::io::Error),

    #[error("config error: {0}")]
    ConfigError( #[from] udfire_common::config::ConfigError),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("operation failed: {0}")]
    OpFailed( String ),
}

pub fn op_failed (msg: impl ToString)->UdfireServerError {
    UdfireServerError::OpFailed(msg.to_string())
}

/// the errors our route handlers report to clients. All of them are sent as `{"detail": <msg>}` JSON
/// bodies, only the status code differs
#[derive(Error,Debug)]
pub enum ApiError {
    /// missing or malformed query parameters (422)
    #[error("{0}")]
    Validation(String),

    /// well formed but unsupported request values (400)
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// anything that went wrong while processing, esp. upstream (remote) failures (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation (msg: impl ToString)->Self { ApiError::Validation(msg.to_string()) }
    pub fn bad_request (msg: impl ToString)->Self { ApiError::BadRequest(msg.to_string()) }
    pub fn not_found (msg: impl ToString)->Self { ApiError::NotFound(msg.to_string()) }
    pub fn internal (msg: impl ToString)->Self { ApiError::Internal(msg.to_string()) }

    pub fn status_code (&self)->StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize,Debug)]
pub struct ErrorBody {
    pub detail: String
}

impl IntoResponse for ApiError {
    fn into_response (self)->Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        } else {
            warn!("rejected request: {}", self);
        }

        (status, Json( ErrorBody{ detail: self.to_string() })).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from (rejection: QueryRejection)->Self {
        ApiError::Validation( rejection.body_text())
    }
}
