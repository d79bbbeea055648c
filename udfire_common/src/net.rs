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


//! common utility functions for network operations

use std::{collections::HashMap, path::Path};
use reqwest::{header::{HeaderMap,HeaderValue,ACCEPT,CONTENT_TYPE}, Client, Response, StatusCode};
use lazy_static::lazy_static;
use serde::{de::DeserializeOwned,Serialize};
use serde_json::Value;

use crate::{define_error, fs};

define_error!{ pub UdfireNetError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    NotFoundError(String) : "not found {0}",
    StatusError(u16,String) : "response status {0}: {1}",
    ParseError(String) : "parse error: {0}"
}

pub type Result<T> = std::result::Result<T, UdfireNetError>;

/// GET `url` and parse the response body as JSON, without assuming a specific structure
pub async fn get_json_value (client: &Client, url: &str, opt_headers: &Option<HeaderMap>) -> Result<Value> {
    get_json( client, url, opt_headers).await
}

/// GET `url` and deserialize the JSON response body
pub async fn get_json<T> (client: &Client, url: &str, opt_headers: &Option<HeaderMap>) -> Result<T> where T: DeserializeOwned {
    let mut req = client.get(url).header( ACCEPT, "application/json");
    if let Some(headermap) = &opt_headers {
        req = req.headers(headermap.clone())
    }

    let response = req.send().await?;
    check_response( url, response).await
}

/// POST `data` as JSON to `url`, optionally with a bearer token, and deserialize the JSON response
pub async fn post_json_query<T,U> (client: &Client, url: &str, bearer: Option<&str>, data: &T) -> Result<U> where T: Serialize, U: DeserializeOwned {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut req = client.post( url)
        .headers( headers)
        .json( data);

    if let Some(token) = bearer {
        req = req.bearer_auth( token);
    }

    let response = req.send().await?;
    check_response( url, response).await
}

async fn check_response<T> (url: &str, response: Response)->Result<T> where T: DeserializeOwned {
    match response.status() {
        StatusCode::OK => {
            from_json( response).await
        }
        StatusCode::NOT_FOUND => {
            Err( UdfireNetError::NotFoundError(format!("{url}")))
        }
        other => {
            let body = response.text().await.unwrap_or_default();
            Err( UdfireNetError::StatusError( other.as_u16(), body))
        }
    }
}

pub async fn from_json<T> (response: Response)->Result<T> where T: DeserializeOwned {
    let bytes = response.bytes().await?;
    serde_json::from_slice( &bytes).map_err(|e| UdfireNetError::ParseError(e.to_string()))
}

/// Note - we assume lower case extensions without '.'
pub fn mime_type_for_extension (ext: &str) -> Option<&'static str> {
    MIME_MAP.get(ext).map(|v| &**v)
}

// Note - we assume lower case extensions
pub fn mime_type_for_path<'a,T: AsRef<Path>> (path: &'a T) -> Option<&'static str> {
    fs::extension(path).and_then(|ext| mime_type_for_extension(ext))
}

lazy_static! {
    static ref MIME_MAP: HashMap<&'static str, &'static str> = HashMap::from( [ // file extension -> mime type
        ("json", "application/json"),
        ("geojson", "application/geo+json"),
        ("csv", "text/csv"),
        ("txt", "text/plain"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("tif", "image/tiff"),
        ("tiff", "image/tiff"),
        ("htm", "text/html"),
        ("html", "text/html"),
        ("xml", "application/xml"),
        ("gz", "application/gzip"),
        ("zip", "application/zip"),
    ]);
}
