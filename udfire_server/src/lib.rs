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


use std::{net::SocketAddr, path::{Path,PathBuf}};

use axum::{body::Body, response::{Response,IntoResponse}, Router, http::{header, StatusCode, HeaderMap, HeaderValue}};
use axum_server::tls_rustls::RustlsConfig;
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;
use serde::{Deserialize,Serialize};

use udfire_common::{define_load_config, fs, net, if_let, strings};

pub mod prelude;
pub mod api;
pub use api::{ApiService, ApiServiceListBuilder, ApiServer, ApiResponse, NoMeta};

pub mod errors;
use errors::{UdfireServerResult, UdfireServerError};
pub use errors::ApiError;

define_load_config!{}

type Result<T> = UdfireServerResult<T>;

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ServerConfig {
    pub sock_addr: SocketAddr,
    pub tls: Option<TlsConfig>, // if set use TLS (https)

    #[serde(default="default_title")]
    pub title: String,

    #[serde(default="default_version")]
    pub version: String,

    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_title()->String { "CMU UDFire API".to_string() }
fn default_version()->String { env!("CARGO_PKG_VERSION").to_string() }

impl ServerConfig {
    pub fn url(&self) -> String {
        let proto = if self.tls.is_some() {"https"} else {"http"};
        format!("{}://{}", proto, self.sock_addr)
    }
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct TlsConfig {
    pub cert_path: String, // path to PEM encoded certificate
    pub key_path: String,  // path to PEM encoded key data
}

/// cross origin settings for browser clients (the dashboard is served from a different origin)
#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct CorsConfig {
    /// explicit origins, or "*" for any (which disables credentials)
    pub allow_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default()->Self {
        CorsConfig { allow_origins: vec!["http://localhost:5173".to_string()], allow_credentials: true }
    }
}

impl CorsConfig {
    /// build the tower-http layer. Methods and headers are mirrored from the preflight request, which
    /// (unlike wildcards) can be combined with credentials
    pub fn layer (&self)->Result<CorsLayer> {
        let layer = CorsLayer::new()
            .allow_methods( AllowMethods::mirror_request())
            .allow_headers( AllowHeaders::mirror_request());

        if self.allow_origins.iter().any( |o| o == "*") {
            Ok( layer.allow_origin( AllowOrigin::any()) )

        } else {
            let mut origins: Vec<HeaderValue> = Vec::with_capacity( self.allow_origins.len());
            for o in &self.allow_origins {
                origins.push( HeaderValue::from_str(o).map_err(|e| UdfireServerError::InvalidHeader(format!("origin {o}: {e}")))?);
            }
            Ok( layer.allow_origin( AllowOrigin::list(origins)).allow_credentials( self.allow_credentials) )
        }
    }
}

/// install a global fmt subscriber that is controlled by RUST_LOG, falling back to `default_filter`.
/// This only succeeds if there is no global subscriber set yet
pub fn init_tracing (default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter( filter)
        .try_init();
}

/// spawn the server task. Bind and TLS setup errors are reported through the returned JoinHandle
pub fn spawn_server_task (config: &ServerConfig, router: Router) -> JoinHandle<Result<()>> {
    let sock_addr = config.sock_addr;
    let router_svc = router.into_make_service_with_connect_info::<SocketAddr>();

    if let Some(tls) = &config.tls {
        let cert_path = strings::env_expand( &tls.cert_path);
        let key_path = strings::env_expand( &tls.key_path);
        tokio::spawn( async move {
            let tls_config = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path)).await?;
            axum_server::bind_rustls( sock_addr, tls_config).serve( router_svc).await?;
            Ok(())
        })
    } else {
        tokio::spawn( async move {
            let listener = tokio::net::TcpListener::bind(sock_addr).await?;
            axum::serve( listener, router_svc).await?;
            Ok(())
        })
    }
}

//--- handler utility functions

const STREAM_SIZE: u64 = 65535;

/// respond with the contents of a (potentially large) file. If `inline` is set the browser should display
/// it instead of downloading it. `content_type` defaults to the mime type for the file extension
pub async fn file_response<P: AsRef<Path>> (path: P, content_type: Option<&str>, inline: bool, not_found_msg: &str) -> Response {
    let path = path.as_ref();
    if_let! {
        Some(fname) = { fs::filename( &path) } else { ApiError::bad_request("invalid file name").into_response() },
        true = { path.is_file() } else { ApiError::not_found(not_found_msg).into_response() },
        Some(mime_type) = { content_type.or_else( || net::mime_type_for_path( &path)) } else { ApiError::bad_request("unsupported mime type").into_response() },
        Some(flen) = { fs::file_length(path) } else { ApiError::not_found(not_found_msg).into_response() } => {
            let mut headers = HeaderMap::new();
            if let Ok(hv) = HeaderValue::from_str(mime_type) {
                headers.insert( header::CONTENT_TYPE, hv);
            }
            let disposition = if inline { "inline".to_string() } else { format!("attachment; filename=\"{}\"", fname) };
            if let Ok(hv) = HeaderValue::from_str(&disposition) {
                headers.insert( header::CONTENT_DISPOSITION, hv);
            }

            if flen < STREAM_SIZE {
                match tokio::fs::read( path).await {
                    Ok(data) => (StatusCode::OK, headers, Body::from(data)).into_response(),
                    Err(e) => ApiError::internal( format!("failed to read file: {e}")).into_response()
                }
            } else {
                match tokio::fs::File::open( path).await {
                    Ok(file) => (StatusCode::OK, headers, Body::from_stream( ReaderStream::new(file))).into_response(),
                    Err(e) => ApiError::internal( format!("failed to open file: {e}")).into_response()
                }
            }
        }
    }
}

//--- syntactic sugar macros

#[macro_export]
macro_rules! build_service {
    ( $($v:ident $(. $op:ident ())?),* => $e:expr) => {
        {
            $( let $v = $v $( .$op() )?; )*
            move || { $e }
        }
    };

    ( $e:expr) => {
        move || { $e }
    }
}
