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


//! proxy for NASA FIRMS (Fire Information for Resource Management System) active fire detections, and
//! the static hexagon fire risk predictions. Served as the `/hotspot` routes of [`HotspotService`]

use std::{path::PathBuf, time::Duration};
use serde::{Deserialize, Serialize};
use udfire_common::{define_load_config, datetime::{deserialize_duration, serialize_duration, secs}};

pub mod errors;
pub use errors::{FirmsError, Result};

pub mod firms;
pub use firms::{FirmsClient, country_records_to_geojson};

mod hotspot_service;
pub use hotspot_service::HotspotService;

define_load_config!{}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct FirmsConfig {
    #[serde(default="default_base_url")]
    pub base_url: String,

    pub map_key: String,  // keep this private - it is rate limited

    /// WFS feature type of the primary (GeoJSON) source
    #[serde(default="default_wfs_layer")]
    pub wfs_layer: String,

    #[serde(default="default_max_features")]
    pub max_features: u32,

    /// WFS region if the request does not specify one
    #[serde(default="default_region")]
    pub default_region: String,

    // the fallback country API
    #[serde(default="default_source")]
    pub source: String,

    #[serde(default="default_country")]
    pub country: String,

    #[serde(default="default_day_range")]
    pub day_range: u32,

    #[serde(default="default_timeout", deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub timeout: Duration,

    /// GeoJSON file with the hexagon predictions
    #[serde(default="default_hexagon_predictions")]
    pub hexagon_predictions: PathBuf,
}

fn default_base_url()->String { "https://firms.modaps.eosdis.nasa.gov".to_string() }
fn default_wfs_layer()->String { "ms:fires_modis_24hrs".to_string() }
fn default_max_features()->u32 { 1000 }
fn default_region()->String { "SouthEast_Asia".to_string() }
fn default_source()->String { "MODIS_NRT".to_string() }
fn default_country()->String { "THA".to_string() }
fn default_day_range()->u32 { 1 }
fn default_timeout()->Duration { secs(30) }
fn default_hexagon_predictions()->PathBuf { PathBuf::from("hex_forest_pro_4326_predict.geojson") }

impl FirmsConfig {
    /// a config with defaults for everything but the map key
    pub fn with_map_key (map_key: impl ToString)->Self {
        FirmsConfig {
            base_url: default_base_url(),
            map_key: map_key.to_string(),
            wfs_layer: default_wfs_layer(),
            max_features: default_max_features(),
            default_region: default_region(),
            source: default_source(),
            country: default_country(),
            day_range: default_day_range(),
            timeout: default_timeout(),
            hexagon_predictions: default_hexagon_predictions(),
        }
    }
}
