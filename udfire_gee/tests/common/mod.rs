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

use std::sync::Mutex;
use async_trait::async_trait;
use serde_json::{json, Value};

use udfire_gee::{expr::Expr, EarthEngine, GeeError, Result, TileMap};

/// an EarthEngine that records all requests and answers with canned values
pub struct MockEarthEngine {
    pub computed: Mutex<Vec<Expr>>,
    pub maps: Mutex<Vec<Expr>>,
    pub stats: Value,
    pub fail: bool,
}

impl MockEarthEngine {
    pub fn new (stats: Value)->Self {
        MockEarthEngine { computed: Mutex::new(Vec::new()), maps: Mutex::new(Vec::new()), stats, fail: false }
    }

    pub fn failing ()->Self {
        MockEarthEngine { fail: true, ..Self::new( Value::Null) }
    }

    pub fn computed (&self)->Vec<Expr> { self.computed.lock().unwrap().clone() }
    pub fn maps (&self)->Vec<Expr> { self.maps.lock().unwrap().clone() }

    /// the single recorded map expression whose root is `Image.visualize` with the given min value
    pub fn map_with_min (&self, min: f64)->Expr {
        self.maps().into_iter()
            .find( |e| e.arg("min").and_then(Expr::as_constant) == Some(&json!(min)))
            .expect("no map with matching min")
    }
}

pub fn bounds_polygon ()->Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[98.0, 18.0], [98.5, 18.0], [98.5, 18.5], [98.0, 18.5], [98.0, 18.0]]]
    })
}

#[async_trait]
impl EarthEngine for MockEarthEngine {
    async fn compute_value (&self, expr: &Expr)->Result<Value> {
        self.computed.lock().unwrap().push( expr.clone());
        if self.fail {
            return Err( GeeError::RemoteError( 400, "Collection.loadTable: Table not found".to_string()))
        }

        match expr.function_name() {
            Some("Geometry.bounds") => Ok( bounds_polygon()),
            Some("Image.reduceRegion") => Ok( self.stats.clone()),
            other => Err( GeeError::UnexpectedResponse( format!("unexpected computation {other:?}")))
        }
    }

    async fn create_map (&self, expr: &Expr)->Result<TileMap> {
        let mut maps = self.maps.lock().unwrap();
        maps.push( expr.clone());
        let name = format!("projects/test/maps/m{}", maps.len());
        Ok( TileMap { url_format: format!("https://earthengine.googleapis.com/v1/{name}/tiles/{{z}}/{{x}}/{{y}}"), name })
    }
}
