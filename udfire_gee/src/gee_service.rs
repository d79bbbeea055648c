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
use axum::{extract::{rejection::QueryRejection, Query, State}, routing::get, Router};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use udfire_common::{check_range, datetime::{days_before, format_date, parse_optional_date, today}, define_serde_struct};
use udfire_server::{ApiError, ApiResponse, ApiService};

use crate::{
    areas::{listed_areas, study_area, AreaInfo, StudyArea},
    client::{EarthEngine, EeClient},
    layers::{BiomassLayer, BurnScarLayer, FloodLayer, IndexLayer, LayerBuilder, SpectralIndex},
    GeeConfig, Result
};

pub const DEFAULT_DAYS: u32 = 30;
pub const MAX_DAYS: u32 = 365;
pub const DEFAULT_CLOUD_COVER: u32 = 30;
pub const DEFAULT_BURN_WINDOW: u32 = 30;

type QueryResult<T> = std::result::Result<Query<T>,QueryRejection>;
type GeeState = State<Arc<GeeCore>>;
type ApiResult<T,M> = std::result::Result<ApiResponse<T,M>,ApiError>;

/// the `/gee` routes
#[derive(Clone)]
pub struct GeeService {
    core: Arc<GeeCore>,
}

struct GeeCore {
    ee: Arc<dyn EarthEngine>,
    config: GeeConfig,
}

impl GeeCore {
    fn layers (&self)->LayerBuilder<'_> {
        LayerBuilder::new( self.ee.as_ref(), &self.config)
    }
}

impl GeeService {
    pub fn new (ee: Arc<dyn EarthEngine>, config: GeeConfig)->Self {
        GeeService { core: Arc::new( GeeCore { ee, config }) }
    }

    /// connect to Earth Engine with the configured credentials
    pub async fn initialize (config: GeeConfig)->Result<Self> {
        let client = EeClient::initialize( &config).await?;
        Ok( Self::new( Arc::new(client), config))
    }
}

impl ApiService for GeeService {
    fn name (&self)->&'static str { "gee" }

    fn router (&self)->Router {
        Router::new()
            .route( "/ndmi", get( |State(gee): GeeState, q: QueryResult<CompositeQuery>| index_layer( gee, SpectralIndex::Ndmi, q)))
            .route( "/ndvi", get( |State(gee): GeeState, q: QueryResult<CompositeQuery>| index_layer( gee, SpectralIndex::Ndvi, q)))
            .route( "/ndwi", get( |State(gee): GeeState, q: QueryResult<CompositeQuery>| index_layer( gee, SpectralIndex::Ndwi, q)))
            .route( "/biomass", get( biomass_layer))
            .route( "/burn-scar", get( burn_scar_layer))
            .route( "/flood", get( flood_layer))
            .route( "/study-areas", get( study_areas))
            .with_state( self.core.clone())
    }
}

//--- query parameters and response metadata

define_serde_struct! { pub CompositeQuery : Debug =
    pub area: Option<String>,
    pub end_date: Option<String>,
    pub days: Option<u32>
}

define_serde_struct! { pub BurnScarQuery : Debug =
    pub area: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub cloud_cover: Option<u32>
}

define_serde_struct! { pub FloodQuery : Debug =
    pub area: Option<String>,
    pub before_date: Option<String>,
    pub after_date: Option<String>
}

#[derive(Serialize,Debug)]
struct CompositeMeta {
    layer_type: &'static str,
    area: &'static str,
    end_date: String,
    days_composite: u32,
}

#[derive(Serialize,Debug)]
struct BurnScarMeta {
    layer_type: &'static str,
    area: &'static str,
    start_date: String,
    end_date: String,
    cloud_cover: u32,
}

#[derive(Serialize,Debug)]
struct FloodMeta {
    layer_type: &'static str,
    area: &'static str,
    before_date: String,
    after_date: String,
}

fn required_area (area: &Option<String>)->std::result::Result<&'static StudyArea,ApiError> {
    match area.as_deref().map( str::trim) {
        None | Some("") => Err( ApiError::validation("area: missing required query parameter")),
        Some(code) => Ok( study_area( code)? )
    }
}

fn optional_date (name: &str, spec: &Option<String>, default: NaiveDate)->std::result::Result<NaiveDate,ApiError> {
    match parse_optional_date( spec) {
        Ok(date) => Ok( date.unwrap_or(default)),
        Err(s) => Err( ApiError::validation( format!("{name}: invalid date '{s}' (expected YYYY-MM-DD)")))
    }
}

fn required_date (name: &str, spec: &Option<String>)->std::result::Result<NaiveDate,ApiError> {
    match parse_optional_date( spec) {
        Ok(Some(date)) => Ok(date),
        Ok(None) => Err( ApiError::validation( format!("{name}: missing required query parameter"))),
        Err(s) => Err( ApiError::validation( format!("{name}: invalid date '{s}' (expected YYYY-MM-DD)")))
    }
}

fn ranged (name: &str, value: Option<u32>, default: u32, min: u32, max: u32)->std::result::Result<u32,ApiError> {
    check_range( name, value.unwrap_or(default), min, max).map_err( ApiError::validation)
}

struct CompositeParams {
    area: &'static StudyArea,
    end_date: NaiveDate,
    days: u32,
}

impl CompositeParams {
    fn from_query (query: QueryResult<CompositeQuery>)->std::result::Result<Self,ApiError> {
        let Query(q) = query?;
        let area = required_area( &q.area)?;
        let end_date = optional_date( "end_date", &q.end_date, today())?;
        let days = ranged( "days", q.days, DEFAULT_DAYS, 1, MAX_DAYS)?;
        Ok( CompositeParams { area, end_date, days } )
    }

    fn meta (&self, layer_type: &'static str)->CompositeMeta {
        CompositeMeta { layer_type, area: self.area.code, end_date: format_date( &self.end_date), days_composite: self.days }
    }
}

//--- handlers

async fn index_layer (gee: Arc<GeeCore>, index: SpectralIndex, query: QueryResult<CompositeQuery>)->ApiResult<IndexLayer,CompositeMeta> {
    let p = CompositeParams::from_query( query)?;
    info!("{} layer for area {} ending {} ({} days)", index.layer_type(), p.area.code, p.end_date, p.days);

    let layer = gee.layers().index_layer( index, p.area.code, p.end_date, p.days).await?;
    Ok( ApiResponse::with_meta( layer, p.meta( index.layer_type())) )
}

async fn biomass_layer (State(gee): GeeState, query: QueryResult<CompositeQuery>)->ApiResult<BiomassLayer,CompositeMeta> {
    let p = CompositeParams::from_query( query)?;
    info!("biomass layer for area {} ending {} ({} days)", p.area.code, p.end_date, p.days);

    let layer = gee.layers().biomass_layer( p.area.code, p.end_date, p.days).await?;
    Ok( ApiResponse::with_meta( layer, p.meta("biomass")) )
}

async fn burn_scar_layer (State(gee): GeeState, query: QueryResult<BurnScarQuery>)->ApiResult<BurnScarLayer,BurnScarMeta> {
    let Query(q) = query?;
    let area = required_area( &q.area)?;
    let end_date = optional_date( "end_date", &q.end_date, today())?;
    // the default window start is relative to today, not to an explicit end_date
    let start_date = optional_date( "start_date", &q.start_date, days_before( today(), DEFAULT_BURN_WINDOW))?;
    let cloud_cover = ranged( "cloud_cover", q.cloud_cover, DEFAULT_CLOUD_COVER, 0, 100)?;
    info!("burn scar layer for area {} from {} to {} (cloud cover < {})", area.code, start_date, end_date, cloud_cover);

    let layer = gee.layers().burn_scar_layer( area.code, start_date, end_date, cloud_cover).await?;
    let meta = BurnScarMeta {
        layer_type: "burn_scar",
        area: area.code,
        start_date: format_date( &start_date),
        end_date: format_date( &end_date),
        cloud_cover
    };
    Ok( ApiResponse::with_meta( layer, meta) )
}

async fn flood_layer (State(gee): GeeState, query: QueryResult<FloodQuery>)->ApiResult<FloodLayer,FloodMeta> {
    let Query(q) = query?;
    let area = required_area( &q.area)?;
    let before_date = required_date( "before_date", &q.before_date)?;
    let after_date = required_date( "after_date", &q.after_date)?;
    info!("flood layer for area {} before {} after {}", area.code, before_date, after_date);

    let layer = gee.layers().flood_layer( area.code, before_date, after_date).await?;
    let meta = FloodMeta { layer_type: "flood", area: area.code, before_date: format_date( &before_date), after_date: format_date( &after_date) };
    Ok( ApiResponse::with_meta( layer, meta) )
}

async fn study_areas ()->ApiResponse<IndexMap<&'static str,AreaInfo>> {
    ApiResponse::ok( listed_areas())
}
