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


//! typed builders for the Earth Engine objects we use. They only wrap [`Expr`] nodes so that we can't
//! pass an ImageCollection where the server expects an Image

use std::sync::atomic::{AtomicUsize, Ordering};
use chrono::NaiveDate;
use serde_json::Value;
use udfire_common::datetime::format_date;

use crate::expr::Expr;

static PLACEHOLDER_ID: AtomicUsize = AtomicUsize::new(0);

macro_rules! define_ee_type {
    ( $( $(#[$meta:meta])* $name:ident ),* $(,)? ) => {
        $(
            $(#[$meta])*
            #[derive(Debug,Clone,PartialEq)]
            pub struct $name(Expr);

            impl $name {
                pub fn expr (&self)->&Expr { &self.0 }
                pub fn into_expr (self)->Expr { self.0 }
            }

            impl From<Expr> for $name {
                fn from (e: Expr)->Self { $name(e) }
            }
        )*
    }
}

define_ee_type! {
    Image,
    ImageCollection,
    FeatureCollection,
    Geometry,
    Filter,
    Reducer,
    /// server side date (millis since epoch)
    EeDate,
    /// result of region reductions (band name -> value)
    Dictionary,
}

fn c (v: impl Into<Value>)->Expr { Expr::constant(v) }

fn strings (list: &[&str])->Expr {
    Expr::constant( list.iter().map( |s| Value::from(*s)).collect::<Vec<Value>>())
}

/// right hand operand of image arithmetic. Numbers are turned into constant images
pub trait ImageOperand {
    fn into_image_expr (self)->Expr;
}

impl ImageOperand for f64 {
    fn into_image_expr (self)->Expr { Image::constant(self).into_expr() }
}

impl ImageOperand for &Image {
    fn into_image_expr (self)->Expr { self.0.clone() }
}

impl ImageOperand for Image {
    fn into_image_expr (self)->Expr { self.0 }
}

impl Image {
    pub fn load (id: &str)->Self {
        Image( Expr::invoke( "Image.load", [("id", c(id))]))
    }

    pub fn constant (value: f64)->Self {
        Image( Expr::invoke( "Image.constant", [("value", c(value))]))
    }

    pub fn pixel_area ()->Self {
        Image( Expr::invoke( "Image.pixelArea", []))
    }

    /// terrain slope in degrees of an elevation image
    pub fn slope (dem: &Image)->Self {
        Image( Expr::invoke( "Terrain.slope", [("input", dem.0.clone())]))
    }

    /// (b1 - b2) / (b1 + b2)
    pub fn normalized_difference (&self, b1: &str, b2: &str)->Image {
        Image( Expr::invoke( "Image.normalizedDifference", [
            ("input", self.0.clone()),
            ("bandNames", strings(&[b1,b2]))
        ]))
    }

    pub fn rename (&self, name: &str)->Image {
        Image( Expr::invoke( "Image.rename", [("input", self.0.clone()), ("names", strings(&[name]))]))
    }

    pub fn select (&self, bands: &[&str])->Image {
        Image( Expr::invoke( "Image.select", [("input", self.0.clone()), ("bandSelectors", strings(bands))]))
    }

    pub fn add_bands (&self, other: &Image)->Image {
        Image( Expr::invoke( "Image.addBands", [("dstImg", self.0.clone()), ("srcImg", other.0.clone())]))
    }

    pub fn clip_to_collection (&self, fc: &FeatureCollection)->Image {
        Image( Expr::invoke( "Image.clipToCollection", [("input", self.0.clone()), ("collection", fc.0.clone())]))
    }

    fn binary (&self, function: &str, other: impl ImageOperand)->Image {
        Image( Expr::invoke( function, [("image1", self.0.clone()), ("image2", other.into_image_expr())]))
    }

    pub fn add (&self, other: impl ImageOperand)->Image { self.binary( "Image.add", other) }
    pub fn subtract (&self, other: impl ImageOperand)->Image { self.binary( "Image.subtract", other) }
    pub fn multiply (&self, other: impl ImageOperand)->Image { self.binary( "Image.multiply", other) }
    pub fn divide (&self, other: impl ImageOperand)->Image { self.binary( "Image.divide", other) }
    pub fn pow (&self, other: impl ImageOperand)->Image { self.binary( "Image.pow", other) }
    pub fn lt (&self, other: impl ImageOperand)->Image { self.binary( "Image.lt", other) }
    pub fn gt (&self, other: impl ImageOperand)->Image { self.binary( "Image.gt", other) }

    /// replace pixels for which `test` is non-zero with `value`
    pub fn where_ (&self, test: &Image, value: impl ImageOperand)->Image {
        Image( Expr::invoke( "Image.where", [
            ("input", self.0.clone()),
            ("test", test.0.clone()),
            ("value", value.into_image_expr())
        ]))
    }

    pub fn update_mask (&self, mask: &Image)->Image {
        Image( Expr::invoke( "Image.updateMask", [("image", self.0.clone()), ("mask", mask.0.clone())]))
    }

    pub fn self_mask (&self)->Image {
        Image( Expr::invoke( "Image.selfMask", [("image", self.0.clone())]))
    }

    pub fn reproject (&self, crs: &str, scale: f64)->Image {
        let projection = Expr::invoke( "Projection", [("crs", c(crs))]);
        Image( Expr::invoke( "Image.reproject", [("image", self.0.clone()), ("crs", projection), ("scale", c(scale))]))
    }

    /// best effort reduction over `geometry`. Without `max_pixels` the server default applies
    pub fn reduce_region (&self, reducer: &Reducer, geometry: &Geometry, scale: f64, max_pixels: Option<f64>)->Dictionary {
        let mut reduction = Expr::invoke( "Image.reduceRegion", [
            ("image", self.0.clone()),
            ("reducer", reducer.0.clone()),
            ("geometry", geometry.0.clone()),
            ("scale", c(scale)),
            ("bestEffort", c(true))
        ]);
        if let (Some(n), Expr::Invocation{args,..}) = (max_pixels, &mut reduction) {
            args.insert( "maxPixels".to_string(), c(n));
        }
        Dictionary( reduction)
    }

    /// render a single band image into an RGB image by stretching [min,max] over the palette
    pub fn visualize (&self, min: f64, max: f64, palette: &[String])->Image {
        Image( Expr::invoke( "Image.visualize", [
            ("image", self.0.clone()),
            ("min", c(min)),
            ("max", c(max)),
            ("palette", Expr::constant( palette.to_vec()))
        ]))
    }
}

impl ImageCollection {
    pub fn load (id: &str)->Self {
        ImageCollection( Expr::invoke( "ImageCollection.load", [("id", c(id))]))
    }

    pub fn filter (&self, filter: &Filter)->ImageCollection {
        ImageCollection( Expr::invoke( "Collection.filter", [("collection", self.0.clone()), ("filter", filter.0.clone())]))
    }

    /// images acquired within [start,end)
    pub fn filter_date (&self, start: &EeDate, end: &EeDate)->ImageCollection {
        self.filter( &Filter::date_range( start, end))
    }

    pub fn filter_bounds (&self, area: &FeatureCollection)->ImageCollection {
        self.filter( &Filter::intersects( &area.geometry()))
    }

    /// apply `algorithm` to each image of the collection (server side). The parameter name of the
    /// resulting function depends on how deeply other mapped functions are nested within its body
    pub fn map<F> (&self, algorithm: F)->ImageCollection where F: FnOnce(Image)->Image {
        // the final name is only known after building the body, and enclosing maps must not capture it
        let placeholder = format!("_placeholder_{}", PLACEHOLDER_ID.fetch_add( 1, Ordering::Relaxed));
        let body = algorithm( Image( Expr::Argument( placeholder.clone()))).into_expr();
        let var = format!("_MAPPING_VAR_{}_0", body.function_depth());
        let body = body.rename_argument( &placeholder, &var);

        let function = Expr::Function { params: vec![var], body: Box::new(body) };
        ImageCollection( Expr::invoke( "Collection.map", [("collection", self.0.clone()), ("baseAlgorithm", function)]))
    }

    pub fn select (&self, bands: &[&str])->ImageCollection {
        self.map( |img| img.select( bands))
    }

    pub fn median (&self)->Image {
        Image( Expr::invoke( "ImageCollection.median", [("collection", self.0.clone())]))
    }

    pub fn mean (&self)->Image {
        Image( Expr::invoke( "ImageCollection.mean", [("collection", self.0.clone())]))
    }
}

impl FeatureCollection {
    /// a table asset
    pub fn load (id: &str)->Self {
        FeatureCollection( Expr::invoke( "Collection.loadTable", [("tableId", c(id))]))
    }

    /// union of all feature geometries
    pub fn geometry (&self)->Geometry {
        Geometry( Expr::invoke( "Collection.geometry", [("collection", self.0.clone())]))
    }
}

impl Geometry {
    /// bounding box polygon
    pub fn bounds (&self)->Geometry {
        Geometry( Expr::invoke( "Geometry.bounds", [("geometry", self.0.clone())]))
    }
}

impl Filter {
    pub fn date_range (start: &EeDate, end: &EeDate)->Self {
        let range = Expr::invoke( "DateRange", [("start", start.0.clone()), ("end", end.0.clone())]);
        Filter( Expr::invoke( "Filter.dateRangeContains", [("leftValue", range), ("rightField", c("system:time_start"))]))
    }

    pub fn intersects (geometry: &Geometry)->Self {
        Filter( Expr::invoke( "Filter.intersects", [("leftField", c(".all")), ("rightValue", geometry.0.clone())]))
    }

    pub fn less_than (property: &str, value: f64)->Self {
        Filter( Expr::invoke( "Filter.lessThan", [("leftField", c(property)), ("rightValue", c(value))]))
    }

    pub fn equals (property: &str, value: impl Into<Value>)->Self {
        Filter( Expr::invoke( "Filter.equals", [("leftField", c(property)), ("rightValue", c(value))]))
    }

    /// list valued property contains `value`
    pub fn list_contains (property: &str, value: impl Into<Value>)->Self {
        Filter( Expr::invoke( "Filter.listContains", [("leftField", c(property)), ("rightValue", c(value))]))
    }
}

impl Reducer {
    /// yields `<band>_min` and `<band>_max` entries
    pub fn min_max ()->Self { Reducer( Expr::invoke( "Reducer.minMax", [])) }

    /// yields a `<band>` entry
    pub fn sum ()->Self { Reducer( Expr::invoke( "Reducer.sum", [])) }
}

impl EeDate {
    pub fn new (date: &NaiveDate)->Self {
        EeDate( Expr::invoke( "Date", [("value", c( format_date(date)))]))
    }

    pub fn advance (&self, delta: f64, unit: &str)->EeDate {
        EeDate( Expr::invoke( "Date.advance", [("date", self.0.clone()), ("delta", c(delta)), ("unit", c(unit))]))
    }
}
