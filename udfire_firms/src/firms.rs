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


//! access to the FIRMS hotspot APIs (see https://firms.modaps.eosdis.nasa.gov/api/). The primary source
//! is the WFS service which directly provides GeoJSON. If that fails we fall back to the country API,
//! which returns a JSON array of detection records that we convert into a GeoJSON FeatureCollection

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use udfire_common::net;
use crate::{errors::{FirmsError, Result}, FirmsConfig};

/// the record fields we pass on as feature properties (null if missing)
pub const PROPERTY_KEYS: [&str;10] = [
    "confidence", "bright_ti4", "bright_ti5", "scan", "track", "acq_date", "acq_time", "satellite", "instrument", "version"
];

pub struct FirmsClient {
    http: Client,
    config: FirmsConfig,
}

impl FirmsClient {
    pub fn new (config: FirmsConfig)->Result<Self> {
        let http = Client::builder().timeout( config.timeout).build()?;
        Ok( FirmsClient { http, config } )
    }

    pub fn config (&self)->&FirmsConfig { &self.config }

    pub fn wfs_url (&self, region: &str)->String {
        let c = &self.config;
        format!( "{}/mapserver/wfs/{}/{}/?SERVICE=WFS&REQUEST=GetFeature&VERSION=2.0.0&TYPENAME={}&STARTINDEX=0&COUNT={}\
                  &SRSNAME=urn:ogc:def:crs:EPSG::4326&BBOX=-90,-180,90,180,urn:ogc:def:crs:EPSG::4326&outputformat=geojson",
                 c.base_url.trim_end_matches('/'), region, c.map_key, c.wfs_layer, c.max_features)
    }

    pub fn country_url (&self)->String {
        let c = &self.config;
        format!( "{}/api/country/json/{}/{}/{}/{}", c.base_url.trim_end_matches('/'), c.map_key, c.source, c.country, c.day_range)
    }

    /// the current hotspots of `region` (or the configured default) as GeoJSON
    pub async fn get_hotspots (&self, region: Option<&str>)->Result<Value> {
        let region = region.map( str::trim).filter( |r| !r.is_empty()).unwrap_or( self.config.default_region.as_str());
        check_region( region)?;

        match net::get_json_value( &self.http, &self.wfs_url( region), &None).await {
            Ok(geojson) => {
                debug!("got WFS hotspots for region {}", region);
                Ok(geojson)
            }
            Err(e) => {
                warn!("FIRMS WFS request for region {} failed: {}, trying country API", region, e);
                match self.get_country_hotspots().await {
                    Ok(fc) => Ok(fc),
                    Err(e) => {
                        warn!("FIRMS country API request failed: {}", e);
                        Err( FirmsError::BothSourcesFailed())
                    }
                }
            }
        }
    }

    async fn get_country_hotspots (&self)->Result<Value> {
        let records = match net::get_json_value( &self.http, &self.country_url(), &None).await? {
            Value::Array(records) => records,
            other => return Err( FirmsError::UnexpectedData( format!("expected record array, got {}", type_name(&other))))
        };
        info!("got {} hotspots for {} from {}", records.len(), self.config.country, self.config.source);

        let fc = country_records_to_geojson( &records);
        serde_json::to_value( &fc).map_err( |e| FirmsError::UnexpectedData( e.to_string()))
    }
}

/// region names become URL path elements
fn check_region (region: &str)->Result<()> {
    if region.chars().all( |c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err( FirmsError::InvalidRegion( region.to_string()))
    }
}

fn type_name (v: &Value)->&'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// coordinates can be numbers or numeric strings
fn coordinate (record: &Value, key: &str)->Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None
    }
}

/// turn country API records into point features. Records without valid coordinates are skipped
pub fn country_records_to_geojson (records: &[Value])->FeatureCollection {
    let mut features = Vec::with_capacity( records.len());

    for record in records {
        if let (Some(lon), Some(lat)) = (coordinate( record, "longitude"), coordinate( record, "latitude")) {
            let mut properties = JsonObject::new();
            for key in PROPERTY_KEYS {
                properties.insert( key.to_string(), record.get(key).cloned().unwrap_or(Value::Null));
            }

            features.push( Feature {
                bbox: None,
                geometry: Some( Geometry::new( geojson::Value::Point( vec![lon, lat]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        } else {
            warn!("skipping FIRMS record without valid coordinates: {}", record);
        }
    }

    FeatureCollection { bbox: None, features, foreign_members: None }
}
