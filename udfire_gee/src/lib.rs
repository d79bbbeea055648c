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


//! Google Earth Engine access for the UDFire API.
//!
//! All raster processing happens remotely. We build lazy [`expr::Expr`] graphs for the requested layer
//! (vegetation and moisture indices, burn scars, biomass, flood extent), send them to the Earth Engine
//! REST API to obtain map tile URL templates and region statistics, and serve the results through
//! the `/gee` routes of [`GeeService`].

use std::time::Duration;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use udfire_common::{define_load_config, datetime::{deserialize_duration, serialize_duration, secs}};

pub mod errors;
pub use errors::{GeeError, Result};

pub mod expr;
pub mod ee;
pub mod areas;
pub use areas::{StudyArea, Palette, study_area, listed_areas};

pub mod client;
pub use client::{EarthEngine, EeClient, EeRest, TileMap};

pub mod layers;
pub use layers::{LayerBuilder, SpectralIndex};

mod gee_service;
pub use gee_service::GeeService;

define_load_config!{}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct GeeConfig {
    #[serde(default="default_api_url")]
    pub api_url: String,

    /// cloud project to bill requests to. Defaults to the project of the credentials
    #[serde(default)]
    pub project: Option<String>,

    /// path of the service account key file. Overridden by `$GEE_SERVICE_ACCOUNT`
    #[serde(default)]
    pub service_account_file: Option<String>,

    #[serde(default="default_asset_root")]
    pub asset_root: String,

    #[serde(default="default_timeout", deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub timeout: Duration,

    /// pixel scale (meters) for min/max statistics
    #[serde(default="default_stats_scale")]
    pub stats_scale: f64,

    /// pixel scale (meters) for the flooded area sum
    #[serde(default="default_flood_scale")]
    pub flood_scale: f64,

    /// date window (start,end) for the median solar radiation used by the biomass model
    #[serde(default="default_solar_window")]
    pub solar_window: (NaiveDate,NaiveDate),
}

fn default_api_url()->String { "https://earthengine.googleapis.com".to_string() }
fn default_asset_root()->String { "projects/ee-sakda-451407/assets/fire".to_string() }
fn default_timeout()->Duration { secs(120) }
fn default_stats_scale()->f64 { 500.0 }
fn default_flood_scale()->f64 { 10.0 }
fn default_solar_window()->(NaiveDate,NaiveDate) {
    (NaiveDate::from_ymd_opt(2023,11,1).unwrap_or_default(), NaiveDate::from_ymd_opt(2024,3,30).unwrap_or_default())
}

impl Default for GeeConfig {
    fn default()->Self {
        GeeConfig {
            api_url: default_api_url(),
            project: None,
            service_account_file: None,
            asset_root: default_asset_root(),
            timeout: default_timeout(),
            stats_scale: default_stats_scale(),
            flood_scale: default_flood_scale(),
            solar_window: default_solar_window(),
        }
    }
}
