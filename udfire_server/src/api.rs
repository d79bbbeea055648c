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


use std::{any::type_name, sync::Arc};

use axum::{response::{IntoResponse, Response}, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{errors::{op_failed, ApiError, UdfireServerResult}, spawn_server_task, ServerConfig};

/// the trait that abstracts a group of related API routes (such as all Earth Engine layers). Each
/// service is mounted under its own path prefix `/<name>`
pub trait ApiService: Send + Sync + 'static {
    /// override this if the service depends on other services. Default is it doesn't
    fn add_dependencies (&self, sb: ApiServiceListBuilder)->ApiServiceListBuilder { sb }

    /// the path prefix this service is mounted under (without leading '/')
    fn name (&self)->&'static str;

    /// the routes of this service, relative to its prefix. Called once during server construction
    fn router (&self)->Router;
}

/// an object to build ApiService lists from services that can recursively depend on other services.
/// Each service type is included just once, in the order of first occurrence
pub struct ApiServiceListBuilder {
    seen: Vec<&'static str>,
    services: Vec<Box<dyn ApiService>>
}

impl ApiServiceListBuilder {
    pub fn new ()->Self { ApiServiceListBuilder{seen: Vec::new(), services: Vec::new()} }

    pub fn add<F,T> (self, svc_ctor: F)->Self where F: FnOnce()->T, T: ApiService + 'static {
        let name = type_name::<T>();
        if !self.seen.contains(&name) {
            let svc = svc_ctor();
            let mut sb = svc.add_dependencies( self);
            sb.seen.push(name);
            sb.services.push( Box::new(svc));
            sb
        } else {
            self
        }
    }

    pub fn build (self)->Vec<Box<dyn ApiService>> {
        self.services
    }
}

/// metadata placeholder for responses that only have `success` and `data` fields
#[derive(Serialize,Debug,Default,Clone,Copy)]
pub struct NoMeta {}

/// the uniform success envelope: `{"success": true, "data": <data>, ..<meta fields>}`
#[derive(Serialize,Debug)]
pub struct ApiResponse<T,M=NoMeta> {
    pub success: bool,
    pub data: T,

    #[serde(flatten)]
    pub meta: M,
}

impl<T> ApiResponse<T,NoMeta> where T: Serialize {
    pub fn ok (data: T)->Self { ApiResponse { success: true, data, meta: NoMeta{} } }
}

impl<T,M> ApiResponse<T,M> where T: Serialize, M: Serialize {
    pub fn with_meta (data: T, meta: M)->Self { ApiResponse { success: true, data, meta } }
}

impl<T,M> IntoResponse for ApiResponse<T,M> where T: Serialize, M: Serialize {
    fn into_response (self)->Response {
        Json(self).into_response()
    }
}

/// the server that combines our ApiServices with the generic root, health and fallback routes
pub struct ApiServer {
    config: ServerConfig,
    services: Vec<Box<dyn ApiService>>,
}

impl ApiServer {
    pub fn new (config: ServerConfig, services: Vec<Box<dyn ApiService>>)->Self {
        ApiServer { config, services }
    }

    pub fn config (&self)->&ServerConfig { &self.config }

    /// the document we return for `GET /`
    fn root_doc (&self)->Value {
        let mut endpoints = Map::new();
        for svc in &self.services {
            let name = svc.name();
            endpoints.insert( name.to_string(), Value::String( format!("/{name}")));
        }

        json!({
            "message": format!("Welcome to {}", self.config.title),
            "version": self.config.version,
            "endpoints": endpoints
        })
    }

    pub fn build_router (&self)->UdfireServerResult<Router> {
        let root_doc = Arc::new( self.root_doc());

        let mut router = Router::new()
            .route( "/", get( {
                let root_doc = root_doc.clone();
                move || { let root_doc = root_doc.clone(); async move { Json( (*root_doc).clone()) } }
            }))
            .route( "/health", get( health_handler));

        for svc in &self.services {
            router = router.nest( &format!("/{}", svc.name()), svc.router());
        }

        Ok( router
            .fallback( fallback_handler)
            .layer( self.config.cors.layer()?)
            .layer( TraceLayer::new_for_http())
        )
    }

    /// build the router and run the server until it terminates
    pub async fn serve (self)->UdfireServerResult<()> {
        let router = self.build_router()?;
        info!("serving {} on {}", self.config.title, self.config.url());

        match spawn_server_task( &self.config, router).await {
            Ok(res) => res,
            Err(e) => Err( op_failed( format!("server task failed: {e}")))
        }
    }
}

async fn health_handler ()->Json<Value> {
    Json( json!({"status": "healthy"}))
}

async fn fallback_handler ()->ApiError {
    ApiError::not_found("Not Found")
}
