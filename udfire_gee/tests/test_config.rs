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

#![allow(unused)]

use anyhow::Result;
use chrono::NaiveDate;

use udfire_common::config::{config_from_str, load_config_file};
use udfire_gee::{client::{project_url, tile_url_format}, GeeConfig};

#[test]
fn test_default_config_file()->Result<()> {
    let config: GeeConfig = load_config_file("../configs/udfire_gee/gee.ron")?;
    println!("{config:#?}");

    assert_eq!( config.asset_root, "projects/ee-sakda-451407/assets/fire");
    assert_eq!( config.timeout.as_secs(), 120);
    assert_eq!( config.solar_window.0, NaiveDate::from_ymd_opt(2023,11,1).unwrap());
    Ok(())
}

#[test]
fn test_minimal_config()->Result<()> {
    let config: GeeConfig = config_from_str( "GeeConfig( project: Some(\"my-project\") )")?;
    assert_eq!( config.project.as_deref(), Some("my-project"));
    assert_eq!( config.api_url, "https://earthengine.googleapis.com");
    assert_eq!( config.stats_scale, 500.0);
    assert_eq!( config.flood_scale, 10.0);
    assert!( config.service_account_file.is_none());
    Ok(())
}

#[test]
fn test_rest_urls() {
    assert_eq!( project_url( "https://earthengine.googleapis.com/", "p1", "value:compute"),
                "https://earthengine.googleapis.com/v1/projects/p1/value:compute");
    assert_eq!( tile_url_format( "https://earthengine.googleapis.com", "projects/p1/maps/abc-123"),
                "https://earthengine.googleapis.com/v1/projects/p1/maps/abc-123/tiles/{z}/{x}/{y}");
}
