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

use std::{net::SocketAddr, sync::{Arc, Mutex}};
use anyhow::Result;
use axum::{extract::Path, http::{header, HeaderMap, StatusCode}, routing::post, Json, Router};
use serde_json::{json, Value};

use udfire_gee::{client::{compute_value_request, map_request}, ee::Image, EeRest, GeeError};

//--- Earth Engine REST requests against a local mock server

#[derive(Clone,Copy)]
enum Upstream { Ok, NoMapName, Rejecting }

/// (endpoint, authorization header, body) of each received request
type Requests = Arc<Mutex<Vec<(String,Option<String>,Value)>>>;

fn record (requests: &Requests, endpoint: String, headers: &HeaderMap, body: Value) {
    let auth = headers.get( header::AUTHORIZATION).and_then( |v| v.to_str().ok()).map( str::to_string);
    requests.lock().unwrap().push( (endpoint, auth, body));
}

fn rejection ()->(StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json( json!({
        "error": { "code": 400, "message": "Image.load: Image asset 'X' not found.", "status": "INVALID_ARGUMENT" }
    })))
}

async fn spawn_mock_ee (mode: Upstream, requests: Requests)->Result<SocketAddr> {
    let compute_requests = requests.clone();
    let map_requests = requests.clone();

    let router = Router::new()
        .route( "/v1/projects/{project}/value:compute", post( move |Path(project): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
            record( &compute_requests, format!("{project}/value:compute"), &headers, body);
            match mode {
                Upstream::Rejecting => rejection(),
                _ => (StatusCode::OK, Json( json!({"result": {"B1_min": 1.0, "B1_max": 2.0}})))
            }
        }))
        .route( "/v1/projects/{project}/maps", post( move |Path(project): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
            record( &map_requests, format!("{project}/maps"), &headers, body);
            match mode {
                Upstream::Ok => (StatusCode::OK, Json( json!({"name": format!("projects/{project}/maps/abc123")}))),
                Upstream::NoMapName => (StatusCode::OK, Json( json!({}))),
                Upstream::Rejecting => rejection(),
            }
        }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn( async move { axum::serve( listener, router).await });
    Ok(addr)
}

async fn mock_rest (mode: Upstream)->Result<(EeRest,Requests,SocketAddr)> {
    let requests: Requests = Arc::new( Mutex::new( Vec::new()));
    let addr = spawn_mock_ee( mode, requests.clone()).await?;
    let rest = EeRest::new( reqwest::Client::new(), &format!("http://{addr}/"), "my-project");
    Ok( (rest, requests, addr) )
}

#[tokio::test]
async fn test_compute_value()->Result<()> {
    let (rest, requests, _) = mock_rest( Upstream::Ok).await?;
    let img = Image::load("X");

    let v = rest.compute_value( Some("tok"), img.expr()).await?;
    assert_eq!( v, json!({"B1_min": 1.0, "B1_max": 2.0}));

    let requests = requests.lock().unwrap();
    assert_eq!( requests.len(), 1);
    let (endpoint, auth, body) = &requests[0];
    assert_eq!( endpoint, "my-project/value:compute");
    assert_eq!( auth.as_deref(), Some("Bearer tok"));
    assert_eq!( body, &json!({"expression": img.expr().to_graph()}));
    assert_eq!( body, &compute_value_request( img.expr()));
    Ok(())
}

#[tokio::test]
async fn test_create_map()->Result<()> {
    let (rest, requests, addr) = mock_rest( Upstream::Ok).await?;
    let vis = Image::load("X").visualize( 0.0, 1.0, &["ff0000".to_string()]);

    let map = rest.create_map( None, vis.expr()).await?;
    assert_eq!( map.name, "projects/my-project/maps/abc123");
    assert_eq!( map.url_format, format!("http://{addr}/v1/projects/my-project/maps/abc123/tiles/{{z}}/{{x}}/{{y}}"));

    let requests = requests.lock().unwrap();
    let (endpoint, auth, body) = &requests[0];
    assert_eq!( endpoint, "my-project/maps");
    assert!( auth.is_none());
    assert_eq!( body["fileFormat"], "AUTO_JPEG_PNG");
    assert_eq!( body["expression"], vis.expr().to_graph());
    assert_eq!( body, &map_request( vis.expr()));
    Ok(())
}

#[tokio::test]
async fn test_map_without_name()->Result<()> {
    let (rest, _, _) = mock_rest( Upstream::NoMapName).await?;
    match rest.create_map( None, Image::load("X").expr()).await {
        Err(GeeError::UnexpectedResponse(msg)) => assert!( msg.contains("map without name")),
        other => panic!("unexpected result {other:?}")
    }
    Ok(())
}

#[tokio::test]
async fn test_remote_error_message()->Result<()> {
    let (rest, _, _) = mock_rest( Upstream::Rejecting).await?;

    match rest.compute_value( None, Image::load("X").expr()).await {
        Err(GeeError::RemoteError(code,msg)) => {
            assert_eq!( code, 400);
            assert_eq!( msg, "Image.load: Image asset 'X' not found.");
        }
        other => panic!("unexpected result {other:?}")
    }

    match rest.create_map( None, Image::load("X").expr()).await {
        Err(e) => assert_eq!( e.to_string(), "Earth Engine request failed (400): Image.load: Image asset 'X' not found."),
        Ok(map) => panic!("rejected map accepted: {map:?}")
    }
    Ok(())
}
