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
use serde_json::{json, Value};

use udfire_gee::{expr::Expr, ee::*};

#[test]
fn test_simple_graph() {
    let img = Image::load("USGS/SRTMGL1_003");
    let graph = img.expr().to_graph();

    assert_eq!( graph, json!({
        "result": "0",
        "values": {
            "0": { "functionInvocationValue": {
                "functionName": "Image.load",
                "arguments": { "id": { "constantValue": "USGS/SRTMGL1_003" }}
            }}
        }
    }));
}

#[test]
fn test_shared_nodes() {
    let img = Image::load("X");
    let sum = img.add( &img).add( 2.0);
    let graph = sum.expr().to_graph();
    println!("{}", serde_json::to_string_pretty(&graph).unwrap());

    let values = graph["values"].as_object().unwrap();
    assert_eq!( values.len(), 4); // load, add, constant image, add

    let load_id = values.iter()
        .find( |(_,v)| v["functionInvocationValue"]["functionName"] == "Image.load")
        .map( |(k,_)| k.clone()).unwrap();

    let first_add = values.values()
        .find( |v| v["functionInvocationValue"]["arguments"]["image1"]["valueReference"] == load_id.as_str())
        .unwrap();
    assert_eq!( first_add["functionInvocationValue"]["arguments"]["image2"]["valueReference"], load_id.as_str());

    let result = &values[ graph["result"].as_str().unwrap()];
    assert_eq!( result["functionInvocationValue"]["functionName"], "Image.add");
}

#[test]
fn test_mapped_function() {
    let coll = ImageCollection::load("COPERNICUS/S2_SR_HARMONIZED")
        .map( |img| img.add_bands( &img.normalized_difference( "B8", "B4").rename("NDVI")));
    let graph = coll.expr().to_graph();
    let values = graph["values"].as_object().unwrap();

    let map = &values[ graph["result"].as_str().unwrap()]["functionInvocationValue"];
    assert_eq!( map["functionName"], "Collection.map");

    let func = &map["arguments"]["baseAlgorithm"]["functionDefinitionValue"];
    assert_eq!( func["argumentNames"], json!(["_MAPPING_VAR_0_0"]));

    let body = &values[ func["body"].as_str().unwrap()]["functionInvocationValue"];
    assert_eq!( body["functionName"], "Image.addBands");
    assert_eq!( body["arguments"]["dstImg"], json!({"argumentReference": "_MAPPING_VAR_0_0"}));
}

#[test]
fn test_nested_mapping_vars() {
    let outer = ImageCollection::load("A");
    let inner = ImageCollection::load("B");

    let coll = outer.map( |img| {
        let mean = inner.map( |other| other.subtract( &img)).mean();
        img.add_bands( &mean)
    });

    let func = coll.expr().arg("baseAlgorithm").unwrap();
    match func {
        Expr::Function{params,body} => {
            assert_eq!( params, &vec!["_MAPPING_VAR_1_0".to_string()]);

            // the inner function refers to both its own and the enclosing parameter
            let subtract = body.find_invocations("Image.subtract");
            assert_eq!( subtract.len(), 1);
            assert_eq!( subtract[0].arg("image1"), Some(&Expr::Argument("_MAPPING_VAR_0_0".to_string())));
            assert_eq!( subtract[0].arg("image2"), Some(&Expr::Argument("_MAPPING_VAR_1_0".to_string())));
        }
        other => panic!("not a function: {other:?}")
    }
}

#[test]
fn test_date_filter() {
    let end = EeDate::new( &NaiveDate::from_ymd_opt(2025,3,15).unwrap());
    let start = end.advance( -30.0, "day");
    let coll = ImageCollection::load("C").filter_date( &start, &end);

    let filter = coll.expr().arg("filter").unwrap();
    assert_eq!( filter.function_name(), Some("Filter.dateRangeContains"));
    assert_eq!( filter.arg("rightField").and_then(Expr::as_constant), Some(&json!("system:time_start")));

    let advance = &coll.expr().find_invocations("Date.advance")[0];
    assert_eq!( advance.arg("delta").and_then(Expr::as_constant), Some(&json!(-30.0)));
    assert_eq!( advance.arg("date").unwrap().arg("value").and_then(Expr::as_constant), Some(&json!("2025-03-15")));
}

#[test]
fn test_reduce_region_options() {
    let area = FeatureCollection::load("projects/p/assets/a");
    let img = Image::load("X");

    let stats = img.reduce_region( &Reducer::min_max(), &area.geometry(), 500.0, None);
    assert!( stats.expr().arg("maxPixels").is_none());
    assert_eq!( stats.expr().arg("bestEffort").and_then(Expr::as_constant), Some(&json!(true)));

    let sum = img.reduce_region( &Reducer::sum(), &area.geometry(), 10.0, Some(1e13));
    assert_eq!( sum.expr().arg("maxPixels").and_then(Expr::as_constant), Some(&json!(1e13)));
    assert_eq!( sum.expr().arg("geometry").and_then(Expr::function_name), Some("Collection.geometry"));
}
