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


use std::{path::PathBuf, sync::Arc};
use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use udfire_common::{net, strings};
use crate::{errors::{unexpected, GeeError, Result}, expr::Expr, GeeConfig};

pub const EE_SCOPE: &str = "https://www.googleapis.com/auth/earthengine";
pub const SERVICE_ACCOUNT_ENV: &str = "GEE_SERVICE_ACCOUNT";
pub const LEGACY_PROJECT: &str = "earthengine-legacy";

/// a created map: the map resource name and the tile URL template for it
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct TileMap {
    pub name: String,
    pub url_format: String,
}

/// the two remote operations the layer builders need. This is where tests plug in their mocks
#[async_trait]
pub trait EarthEngine: Send + Sync + 'static {
    /// evaluate `expr` and return its value as JSON
    async fn compute_value (&self, expr: &Expr)->Result<Value>;

    /// create a map for the (visualized) image `expr`
    async fn create_map (&self, expr: &Expr)->Result<TileMap>;
}

#[derive(Debug,Clone,PartialEq)]
pub enum CredentialSource {
    ServiceAccount(PathBuf),
    Ambient,
}

/// the token independent part of the Earth Engine REST v1 API: endpoints, request bodies and response parsing
pub struct EeRest {
    http: Client,
    api_url: String,
    project: String,
}

#[derive(Deserialize)]
struct ComputeValueResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Deserialize)]
struct MapResponse {
    #[serde(default)]
    name: String,
}

impl EeRest {
    pub fn new (http: Client, api_url: &str, project: &str)->Self {
        EeRest { http, api_url: api_url.trim_end_matches('/').to_string(), project: project.to_string() }
    }

    pub fn project (&self)->&str { &self.project }

    async fn post<T> (&self, bearer: Option<&str>, method: &str, body: &Value)->Result<T> where T: serde::de::DeserializeOwned {
        let url = project_url( &self.api_url, &self.project, method);
        debug!("POST {}", url);
        Ok( net::post_json_query( &self.http, &url, bearer, body).await? )
    }

    /// `POST .../value:compute`
    pub async fn compute_value (&self, bearer: Option<&str>, expr: &Expr)->Result<Value> {
        let response: ComputeValueResponse = self.post( bearer, "value:compute", &compute_value_request( expr)).await?;
        Ok( response.result )
    }

    /// `POST .../maps`
    pub async fn create_map (&self, bearer: Option<&str>, expr: &Expr)->Result<TileMap> {
        let response: MapResponse = self.post( bearer, "maps", &map_request( expr)).await?;
        if response.name.is_empty() { return Err( unexpected("map without name")) }

        let url_format = tile_url_format( &self.api_url, &response.name);
        Ok( TileMap { name: response.name, url_format } )
    }
}

pub fn compute_value_request (expr: &Expr)->Value {
    json!({ "expression": expr.to_graph() })
}

pub fn map_request (expr: &Expr)->Value {
    json!({ "expression": expr.to_graph(), "fileFormat": "AUTO_JPEG_PNG" })
}

/// Earth Engine REST v1 client with OAuth credentials
pub struct EeClient {
    auth: Arc<dyn TokenProvider>,
    credential_source: CredentialSource,
    rest: EeRest,
}

impl EeClient {
    /// authenticate and check credentials. This is supposed to be called once at startup
    pub async fn initialize (config: &GeeConfig)->Result<Self> {
        Self::try_initialize( config).await.map_err( |e| GeeError::InitError( e.to_string()))
    }

    async fn try_initialize (config: &GeeConfig)->Result<Self> {
        let http = Client::builder().timeout( config.timeout).build()?;

        let (auth, credential_source): (Arc<dyn TokenProvider>, CredentialSource) = match service_account_path( config) {
            Some(path) if path.is_file() => {
                let sa = CustomServiceAccount::from_file( &path)?;
                (Arc::new(sa) as Arc<dyn TokenProvider>, CredentialSource::ServiceAccount(path))
            }
            opt_path => {
                if let Some(path) = opt_path { warn!("service account file {:?} not found", path) }
                (gcp_auth::provider().await?, CredentialSource::Ambient)
            }
        };

        auth.token( &[EE_SCOPE]).await?; // fail now if credentials are not usable

        let project = match config.project.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => match auth.project_id().await {
                Ok(p) => p.to_string(),
                Err(_) => LEGACY_PROJECT.to_string()
            }
        };

        match &credential_source {
            CredentialSource::ServiceAccount(path) => info!("Earth Engine initialized with service account: {:?} (project {})", path, project),
            CredentialSource::Ambient => info!("Earth Engine initialized with default credentials (project {})", project),
        }

        Ok( EeClient { auth, credential_source, rest: EeRest::new( http, &config.api_url, &project) })
    }

    pub fn credential_source (&self)->&CredentialSource { &self.credential_source }
    pub fn project (&self)->&str { self.rest.project() }
}

#[async_trait]
impl EarthEngine for EeClient {
    async fn compute_value (&self, expr: &Expr)->Result<Value> {
        let token = self.auth.token( &[EE_SCOPE]).await?;
        self.rest.compute_value( Some(token.as_str()), expr).await
    }

    async fn create_map (&self, expr: &Expr)->Result<TileMap> {
        let token = self.auth.token( &[EE_SCOPE]).await?;
        self.rest.create_map( Some(token.as_str()), expr).await
    }
}

/// `$GEE_SERVICE_ACCOUNT` if set, the configured file otherwise
pub fn service_account_path (config: &GeeConfig)->Option<PathBuf> {
    std::env::var( SERVICE_ACCOUNT_ENV).ok()
        .filter( |s| !s.is_empty())
        .or_else( || strings::env_expand_opt( &config.service_account_file))
        .map( PathBuf::from)
}

pub fn project_url (api_url: &str, project: &str, method: &str)->String {
    format!("{}/v1/projects/{}/{}", api_url.trim_end_matches('/'), project, method)
}

pub fn tile_url_format (api_url: &str, map_name: &str)->String {
    format!("{}/v1/{}/tiles/{{z}}/{{x}}/{{y}}", api_url.trim_end_matches('/'), map_name)
}
