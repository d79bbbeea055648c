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

mod common;

use std::sync::Arc;
use anyhow::Result;
use axum::{body::Body, http::{Request, StatusCode}, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use udfire_common::datetime::{days_before, format_date, today};
use udfire_gee::{GeeConfig, GeeService};
use udfire_server::ApiService;
use common::MockEarthEngine;

fn router_with (ee: MockEarthEngine)->(Router, Arc<MockEarthEngine>) {
    let ee = Arc::new(ee);
    let svc = GeeService::new( ee.clone(), GeeConfig::default());
    (Router::new().nest( "/gee", svc.router()), ee)
}

fn test_router ()->(Router, Arc<MockEarthEngine>) {
    router_with( MockEarthEngine::new( json!({"NDVI_min": 0.1, "NDVI_max": 0.8})))
}

async fn get_json (router: Router, uri: &str)->Result<(StatusCode,Value)> {
    let response = router.oneshot( Request::builder().uri(uri).body(Body::empty())?).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok( (status, serde_json::from_slice(&bytes)?) )
}

#[tokio::test]
async fn test_ndvi_route()->Result<()> {
    let (router, ee) = test_router();
    let (status, doc) = get_json( router, "/gee/ndvi?area=ud&end_date=2025-03-01&days=14").await?;
    println!("{}", serde_json::to_string_pretty(&doc)?);

    assert_eq!( status, StatusCode::OK);
    assert_eq!( doc["success"], true);
    assert_eq!( doc["layer_type"], "ndvi");
    assert_eq!( doc["area"], "ud");
    assert_eq!( doc["end_date"], "2025-03-01");
    assert_eq!( doc["days_composite"], 14);
    assert_eq!( doc["data"]["vis_params"]["min"], 0.1);
    assert!( doc["data"]["tile_url"].as_str().unwrap().contains("{z}/{x}/{y}"));
    assert_eq!( doc["data"]["bounds"][0], json!([98.0, 18.0]));
    assert_eq!( ee.maps().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_defaults()->Result<()> {
    let (router, _) = test_router();
    let (status, doc) = get_json( router, "/gee/ndmi?area=mt").await?;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( doc["days_composite"], 30);
    assert_eq!( doc["end_date"], format_date( &today()));

    let (router, _) = test_router();
    let (status, doc) = get_json( router, "/gee/burn-scar?area=mt").await?;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( doc["layer_type"], "burn_scar");
    assert_eq!( doc["start_date"], format_date( &days_before( today(), 30)));
    assert_eq!( doc["end_date"], format_date( &today()));
    assert_eq!( doc["cloud_cover"], 30);
    Ok(())
}

#[tokio::test]
async fn test_burn_scar_window()->Result<()> {
    // an explicit end_date does not move the default start
    let (router, _) = test_router();
    let (status, doc) = get_json( router, "/gee/burn-scar?area=mt&end_date=2024-01-31").await?;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( doc["start_date"], format_date( &days_before( today(), 30)));
    assert_eq!( doc["end_date"], "2024-01-31");

    // inverted windows are passed on as requested
    let (router, ee) = test_router();
    let (status, doc) = get_json( router, "/gee/burn-scar?area=mt&start_date=2025-03-02&end_date=2025-03-01").await?;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( doc["start_date"], "2025-03-02");
    assert_eq!( ee.maps().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_validation_errors()->Result<()> {
    for uri in [
        "/gee/ndvi",                                   // no area
        "/gee/ndvi?area=ud&end_date=03/01/2025",       // bad date
        "/gee/ndvi?area=ud&days=0",
        "/gee/biomass?area=ud&days=366",
        "/gee/ndwi?area=ud&days=many",
        "/gee/burn-scar?area=ud&cloud_cover=101",
        "/gee/flood?area=ud&before_date=2024-08-01",   // no after_date
    ] {
        let (router, ee) = test_router();
        let (status, doc) = get_json( router, uri).await?;
        assert_eq!( status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert!( doc["detail"].is_string());
        assert!( ee.computed().is_empty() && ee.maps().is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_area()->Result<()> {
    let (router, _) = test_router();
    let (status, doc) = get_json( router, "/gee/ndvi?area=xx").await?;
    assert_eq!( status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!( doc["detail"], "Invalid area code: xx");

    let (router, ee) = test_router();
    let (status, doc) = get_json( router, "/gee/biomass?area=zz").await?;
    assert_eq!( status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!( doc["detail"], "Invalid area code: zz");
    assert!( ee.computed().is_empty() && ee.maps().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_remote_failure()->Result<()> {
    let (router, _) = router_with( MockEarthEngine::failing());
    let (status, doc) = get_json( router, "/gee/flood?area=ms&before_date=2024-08-01&after_date=2024-08-20").await?;
    assert_eq!( status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!( doc["detail"].as_str().unwrap().contains("Table not found"));
    Ok(())
}

#[tokio::test]
async fn test_flood_route()->Result<()> {
    let (router, _) = router_with( MockEarthEngine::new( json!({"VH": 1_000_000.0})));
    let (status, doc) = get_json( router, "/gee/flood?area=msr&before_date=2024-08-01&after_date=2024-08-20").await?;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( doc["layer_type"], "flood");
    assert_eq!( doc["before_date"], "2024-08-01");
    assert_eq!( doc["data"]["flood_area"], 1.0);
    assert_eq!( doc["data"]["confidence"], 85);
    Ok(())
}

#[tokio::test]
async fn test_study_areas()->Result<()> {
    let (router, ee) = test_router();
    let (status, doc) = get_json( router, "/gee/study-areas").await?;
    assert_eq!( status, StatusCode::OK);
    assert_eq!( doc["success"], true);

    let areas = doc["data"].as_object().unwrap();
    assert_eq!( areas.len(), 6);
    assert_eq!( doc["data"]["ky"], json!({"name": "Khun Yuam, Mae Hong Son", "name_th": "ขุนยวม แม่ฮ่องสอน"}));
    assert!( !areas.contains_key("fbound"));
    assert!( ee.computed().is_empty());
    Ok(())
}
