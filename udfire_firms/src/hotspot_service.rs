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


use std::sync::Arc;
use axum::{extract::{rejection::QueryRejection, Query, State}, response::Response, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use udfire_common::define_serde_struct;
use udfire_server::{file_response, ApiError, ApiService};

use crate::{firms::FirmsClient, FirmsConfig, Result};

/// the `/hotspot` routes
#[derive(Clone)]
pub struct HotspotService {
    firms: Arc<FirmsClient>,
}

impl HotspotService {
    pub fn new (config: FirmsConfig)->Result<Self> {
        Ok( HotspotService { firms: Arc::new( FirmsClient::new( config)?) } )
    }
}

impl ApiService for HotspotService {
    fn name (&self)->&'static str { "hotspot" }

    fn router (&self)->Router {
        Router::new()
            .route( "/firms-hotspots", get( firms_hotspots))
            .route( "/hexagon-predictions", get( hexagon_predictions))
            .with_state( self.firms.clone())
    }
}

define_serde_struct! { pub HotspotQuery : Debug =
    pub area: Option<String>
}

/// the GeoJSON is passed through as is (no envelope)
async fn firms_hotspots (State(firms): State<Arc<FirmsClient>>, query: std::result::Result<Query<HotspotQuery>,QueryRejection>)->std::result::Result<Json<Value>,ApiError> {
    let Query(q) = query?;
    let geojson = firms.get_hotspots( q.area.as_deref()).await?;
    Ok( Json(geojson) )
}

async fn hexagon_predictions (State(firms): State<Arc<FirmsClient>>)->Response {
    file_response( &firms.config().hexagon_predictions, Some("application/json"), true, "Hexagon predictions file not found").await
}
