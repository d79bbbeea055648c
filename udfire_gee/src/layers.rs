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


//! the map layers we serve. Each builder assembles the remote computation for one layer, then evaluates
//! statistics and region bounds and creates the tile maps with as many concurrent requests as possible

use chrono::NaiveDate;
use futures::try_join;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    areas::{study_area, Palette}, client::EarthEngine, ee::*,
    errors::{unexpected, Result}, GeeConfig
};

pub const S2_HARMONIZED: &str = "COPERNICUS/S2_SR_HARMONIZED";
pub const S2_SR: &str = "COPERNICUS/S2_SR";
pub const MODIS_SURFACE_REFLECTANCE: &str = "MODIS/061/MOD09GA";
pub const MODIS_SOLAR_RADIATION: &str = "MODIS/062/MCD18A1";
pub const S1_GRD: &str = "COPERNICUS/S1_GRD";
pub const SURFACE_WATER: &str = "JRC/GSW1_4/GlobalSurfaceWater";
pub const SRTM: &str = "USGS/SRTMGL1_003";

pub const BURN_THRESHOLD: f64 = 0.8;
pub const FLOOD_THRESHOLD: f64 = -5.5; // dB
pub const FLOOD_CONFIDENCE: u32 = 85;
pub const FLOOD_WINDOW_DAYS: f64 = 30.0;
pub const PERMANENT_WATER_OCCURRENCE: f64 = 80.0;
pub const MAX_FLOOD_SLOPE: f64 = 5.0; // degrees
pub const FLOOD_MAX_PIXELS: f64 = 1e13;

/// region statistics as returned by Earth Engine (`<band>_min`, `<band>_max` or `<band>`)
pub type Stats = Map<String,Value>;

/// exterior ring of the area bounding box
pub type Bounds = Vec<geojson::Position>;

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
}

impl VisParams {
    pub fn new (min: f64, max: f64, palette: Vec<String>)->Self { VisParams { min, max, palette } }

    /// use the `<band>_min`/`<band>_max` stats if they are set, the given defaults otherwise
    pub fn from_stats (stats: &Stats, band: &str, default_min: f64, default_max: f64, palette: Palette)->Self {
        VisParams {
            min: stat_or( stats, &format!("{band}_min"), default_min),
            max: stat_or( stats, &format!("{band}_max"), default_max),
            palette: palette.to_vec(),
        }
    }
}

pub fn stat_or (stats: &Stats, key: &str, default: f64)->f64 {
    stats.get(key).and_then( Value::as_f64).unwrap_or(default)
}

#[derive(Serialize,Debug,Clone)]
pub struct IndexLayer {
    pub tile_url: String,
    pub vis_params: VisParams,
    pub bounds: Bounds,
    pub stats: Stats,
}

#[derive(Serialize,Debug,Clone)]
pub struct TileLayer {
    pub tile_url: String,
    pub vis_params: VisParams,
}

#[derive(Serialize,Debug,Clone)]
pub struct StatsLayer {
    pub tile_url: String,
    pub vis_params: VisParams,
    pub stats: Stats,
}

#[derive(Serialize,Debug,Clone)]
pub struct BurnScarLayer {
    pub nbr: TileLayer,
    pub burn_scars: TileLayer,
    pub bounds: Bounds,
}

#[derive(Serialize,Debug,Clone)]
pub struct BiomassLayer {
    pub ndvi: StatsLayer,
    pub biomass_3pgs: StatsLayer,
    pub biomass_equation: StatsLayer,
    pub bounds: Bounds,
}

#[derive(Serialize,Debug,Clone)]
pub struct FloodLayer {
    pub tile_url: String,
    pub vis_params: VisParams,
    pub bounds: Bounds,
    /// km²
    pub flood_area: f64,
    pub difference: f64,
    pub confidence: u32,
}

/// normalized difference indices computed from Sentinel-2 surface reflectance
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum SpectralIndex { Ndvi, Ndmi, Ndwi }

impl SpectralIndex {
    pub fn band_name (&self)->&'static str {
        match self { SpectralIndex::Ndvi => "NDVI", SpectralIndex::Ndmi => "NDMI", SpectralIndex::Ndwi => "NDWI" }
    }

    pub fn layer_type (&self)->&'static str {
        match self { SpectralIndex::Ndvi => "ndvi", SpectralIndex::Ndmi => "ndmi", SpectralIndex::Ndwi => "ndwi" }
    }

    /// (b1,b2) of (b1-b2)/(b1+b2)
    pub fn bands (&self)->(&'static str, &'static str) {
        match self {
            SpectralIndex::Ndvi => ("B8", "B4"),  // NIR, red
            SpectralIndex::Ndmi => ("B8", "B11"), // NIR, SWIR
            SpectralIndex::Ndwi => ("B3", "B8"),  // green, NIR
        }
    }

    pub fn default_range (&self)->(f64,f64) {
        match self {
            SpectralIndex::Ndvi => (0.0, 1.0),
            SpectralIndex::Ndmi | SpectralIndex::Ndwi => (-0.5, 0.5),
        }
    }

    pub fn palette (&self)->Palette {
        match self { SpectralIndex::Ndvi => Palette::Ndvi, SpectralIndex::Ndmi => Palette::Ndmi, SpectralIndex::Ndwi => Palette::Ndwi }
    }
}

/// builds layers for a given Earth Engine connection
pub struct LayerBuilder<'a> {
    ee: &'a dyn EarthEngine,
    config: &'a GeeConfig,
}

impl<'a> LayerBuilder<'a> {
    pub fn new (ee: &'a dyn EarthEngine, config: &'a GeeConfig)->Self {
        LayerBuilder { ee, config }
    }

    fn area (&self, area_code: &str)->Result<FeatureCollection> {
        let area = study_area( area_code)?;
        Ok( FeatureCollection::load( &area.asset_id( &self.config.asset_root)) )
    }

    async fn bounds (&self, area: &FeatureCollection)->Result<Bounds> {
        let v = self.ee.compute_value( area.geometry().bounds().expr()).await?;
        let geometry: geojson::Geometry = serde_json::from_value(v)?;
        match geometry.value {
            geojson::Value::Polygon(mut rings) if !rings.is_empty() => Ok( rings.swap_remove(0)),
            _ => Err( unexpected("area bounds are not a polygon"))
        }
    }

    async fn stats (&self, dict: Dictionary)->Result<Stats> {
        match self.ee.compute_value( dict.expr()).await? {
            Value::Object(stats) => Ok(stats),
            Value::Null => Ok( Stats::new()),
            other => Err( unexpected( format!("region statistics are not a dictionary: {other}")))
        }
    }

    async fn min_max (&self, image: &Image, area: &FeatureCollection)->Result<Stats> {
        self.stats( image.reduce_region( &Reducer::min_max(), &area.geometry(), self.config.stats_scale, None)).await
    }

    async fn tile_url (&self, image: &Image, vis: &VisParams)->Result<String> {
        let map = self.ee.create_map( image.visualize( vis.min, vis.max, &vis.palette).expr()).await?;
        debug!("created map {}", map.name);
        Ok( map.url_format )
    }

    /// median composite of a Sentinel-2 normalized difference index over `days` before `end_date`
    pub async fn index_layer (&self, index: SpectralIndex, area_code: &str, end_date: NaiveDate, days: u32)->Result<IndexLayer> {
        let area = self.area( area_code)?;
        let band = index.band_name();
        let (b1, b2) = index.bands();

        let end = EeDate::new( &end_date);
        let start = end.advance( -(days as f64), "day");

        let median = ImageCollection::load( S2_HARMONIZED)
            .filter_date( &start, &end)
            .filter_bounds( &area)
            .map( |img| img.add_bands( &img.normalized_difference( b1, b2).rename( band).clip_to_collection( &area)))
            .select( &[band])
            .median();

        let (stats, bounds) = try_join!( self.min_max( &median, &area), self.bounds( &area))?;

        let (default_min, default_max) = index.default_range();
        let vis_params = VisParams::from_stats( &stats, band, default_min, default_max, index.palette());
        let tile_url = self.tile_url( &median, &vis_params).await?;

        Ok( IndexLayer { tile_url, vis_params, bounds, stats } )
    }

    /// normalized burn ratio and NIRBI thresholded burn scars
    pub async fn burn_scar_layer (&self, area_code: &str, start_date: NaiveDate, end_date: NaiveDate, cloud_cover: u32)->Result<BurnScarLayer> {
        let area = self.area( area_code)?;

        let median = ImageCollection::load( S2_SR)
            .filter_date( &EeDate::new( &start_date), &EeDate::new( &end_date))
            .filter( &Filter::less_than( "CLOUDY_PIXEL_PERCENTAGE", cloud_cover as f64))
            .filter_bounds( &area)
            .map( |img| img.clip_to_collection( &area).divide( 10000.0))
            .median();

        let nbr = median.normalized_difference( "B8A", "B12").rename( "NBR");

        // NIRBI = 10 * B12 - 9.8 * B11 + 2
        let nirbi = median.select( &["B12"]).multiply( 10.0)
            .subtract( &median.select( &["B11"]).multiply( 9.8))
            .add( 2.0)
            .rename( "NIRBI");
        let burn_scars = nirbi.lt( BURN_THRESHOLD);

        let nbr_vis = VisParams::new( -0.3, 0.5, Palette::Burn.to_vec());
        let burn_vis = VisParams::new( 0.0, 1.0, vec!["white".to_string(), "red".to_string()]);

        let (nbr_url, burn_url, bounds) = try_join!(
            self.tile_url( &nbr, &nbr_vis),
            self.tile_url( &burn_scars, &burn_vis),
            self.bounds( &area)
        )?;

        Ok( BurnScarLayer {
            nbr: TileLayer { tile_url: nbr_url, vis_params: nbr_vis },
            burn_scars: TileLayer { tile_url: burn_url, vis_params: burn_vis },
            bounds
        })
    }

    /// MODIS NDVI plus 3PGs light use efficiency biomass and the NDVI regression biomass
    pub async fn biomass_layer (&self, area_code: &str, end_date: NaiveDate, days: u32)->Result<BiomassLayer> {
        let area = self.area( area_code)?;

        let end = EeDate::new( &end_date);
        let start = end.advance( -(days as f64), "day");

        let (solar_start, solar_end) = &self.config.solar_window;
        let solar_radiation = ImageCollection::load( MODIS_SOLAR_RADIATION)
            .filter_date( &EeDate::new( solar_start), &EeDate::new( solar_end))
            .filter_bounds( &area)
            .select( &["GMT_0900_DSR"])
            .median();

        let modis = ImageCollection::load( MODIS_SURFACE_REFLECTANCE)
            .filter_date( &start, &end)
            .filter_bounds( &area)
            .map( |img| img.reproject( "EPSG:32647", 500.0))
            .map( |img| img.add_bands( &img.normalized_difference( "sur_refl_b02", "sur_refl_b01").rename( "NDVI")))
            .map( |img| add_biomass_bands( &img, &solar_radiation));

        let ndvi = modis.select( &["NDVI"]).median().clip_to_collection( &area);
        let bm = modis.select( &["BM"]).median().clip_to_collection( &area);
        let bmt = modis.select( &["BMT"]).median().clip_to_collection( &area);

        let (ndvi_stats, bm_stats, bmt_stats, bounds) = try_join!(
            self.min_max( &ndvi, &area),
            self.min_max( &bm, &area),
            self.min_max( &bmt, &area),
            self.bounds( &area)
        )?;

        let ndvi_vis = VisParams::from_stats( &ndvi_stats, "NDVI", 0.0, 1.0, Palette::Ndvi);
        let bm_vis = VisParams::from_stats( &bm_stats, "BM", 0.0, 10.0, Palette::Biomass);
        let bmt_vis = VisParams::from_stats( &bmt_stats, "BMT", 0.0, 10.0, Palette::Biomass);

        let (ndvi_url, bm_url, bmt_url) = try_join!(
            self.tile_url( &ndvi, &ndvi_vis),
            self.tile_url( &bm, &bm_vis),
            self.tile_url( &bmt, &bmt_vis)
        )?;

        Ok( BiomassLayer {
            ndvi: StatsLayer { tile_url: ndvi_url, vis_params: ndvi_vis, stats: ndvi_stats },
            biomass_3pgs: StatsLayer { tile_url: bm_url, vis_params: bm_vis, stats: bm_stats },
            biomass_equation: StatsLayer { tile_url: bmt_url, vis_params: bmt_vis, stats: bmt_stats },
            bounds
        })
    }

    /// Sentinel-1 VH backscatter change detection between the 30 days before `before_date` and the
    /// 30 days after `after_date`, excluding permanent water and steep terrain
    pub async fn flood_layer (&self, area_code: &str, before_date: NaiveDate, after_date: NaiveDate)->Result<FloodLayer> {
        let area = self.area( area_code)?;

        let s1 = ImageCollection::load( S1_GRD)
            .filter( &Filter::list_contains( "transmitterReceiverPolarisation", "VH"))
            .filter( &Filter::equals( "orbitProperties_pass", "DESCENDING"))
            .filter( &Filter::equals( "instrumentMode", "IW"))
            .filter_bounds( &area);

        let before_end = EeDate::new( &before_date);
        let before_start = before_end.advance( -FLOOD_WINDOW_DAYS, "day");
        let after_start = EeDate::new( &after_date);
        let after_end = after_start.advance( FLOOD_WINDOW_DAYS, "day");

        let before = s1.filter_date( &before_start, &before_end).select( &["VH"]).mean().clip_to_collection( &area);
        let after = s1.filter_date( &after_start, &after_end).select( &["VH"]).mean().clip_to_collection( &area);

        let permanent_water = Image::load( SURFACE_WATER).select( &["occurrence"]).gt( PERMANENT_WATER_OCCURRENCE);
        let slope = Image::slope( &Image::load( SRTM));

        let flooded = after.subtract( &before).lt( FLOOD_THRESHOLD)
            .where_( &permanent_water, 0.0)
            .update_mask( &slope.lt( MAX_FLOOD_SLOPE));

        let area_sum = flooded.multiply( Image::pixel_area())
            .reduce_region( &Reducer::sum(), &area.geometry(), self.config.flood_scale, Some(FLOOD_MAX_PIXELS));
        let vis_params = VisParams::new( 0.0, 1.0, Palette::Flood.to_vec());
        let flood_mask = flooded.self_mask();

        let (stats, tile_url, bounds) = try_join!(
            self.stats( area_sum),
            self.tile_url( &flood_mask, &vis_params),
            self.bounds( &area)
        )?;

        let flood_area = stat_or( &stats, "VH", 0.0) / 1_000_000.0; // m² -> km²

        Ok( FloodLayer { tile_url, vis_params, bounds, flood_area, difference: FLOOD_THRESHOLD, confidence: FLOOD_CONFIDENCE } )
    }
}

/// FPAR, DSR24hr, PAR, APAR, GPP, NPP, BM (3PGs) and BMT (NDVI regression) bands
fn add_biomass_bands (img: &Image, solar_radiation: &Image)->Image {
    let ndvi = img.select( &["NDVI"]);

    let fpar = ndvi.multiply( 1.5).add( 0.1).rename( "FPAR");
    let dsr24hr = solar_radiation.select( &["GMT_0900_DSR"]).multiply( 18000.0).divide( 1_000_000.0).rename( "DSR24hr");
    let par = dsr24hr.multiply( 0.45).rename( "PAR");
    let apar = fpar.multiply( &par).rename( "APAR");
    let gpp = apar.multiply( 1.8).rename( "GPP");
    let npp = gpp.multiply( 0.45).rename( "NPP");
    let bm = npp.multiply( 2.5).rename( "BM");

    // 7.25923 * NDVI³ - 13.419 * NDVI² + 6.4542 * NDVI - 0.2305
    let bmt = ndvi.pow( 3.0).multiply( 7.25923)
        .subtract( &ndvi.pow( 2.0).multiply( 13.419))
        .add( &ndvi.multiply( 6.4542))
        .subtract( 0.2305)
        .rename( "BMT");

    [fpar, dsr24hr, par, apar, gpp, npp, bm, bmt].iter()
        .fold( img.clone(), |acc, band| acc.add_bands( band))
}
