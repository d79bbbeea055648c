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


use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::{GeeError, Result};

/// a study area is a FeatureCollection asset below the configured asset root
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct StudyArea {
    pub code: &'static str,
    pub asset: &'static str,
    pub name: &'static str,
    pub name_th: &'static str,
    /// listed areas are announced by `/gee/study-areas`, unlisted ones can still be requested
    pub listed: bool,
}

impl StudyArea {
    pub fn asset_id (&self, asset_root: &str)->String {
        format!("{}/{}", asset_root.trim_end_matches('/'), self.asset)
    }
}

pub const STUDY_AREAS: &[StudyArea] = &[
    StudyArea { code: "ud", asset: "paktab", name: "Pak Thap, Uttaradit", name_th: "ปากทับ อุตรดิตถ์", listed: true },
    StudyArea { code: "mt", asset: "meatha_n", name: "Mae Tha, Chiang Mai", name_th: "แม่ทาเหนือ เชียงใหม่", listed: true },
    StudyArea { code: "ky", asset: "khunyoam", name: "Khun Yuam, Mae Hong Son", name_th: "ขุนยวม แม่ฮ่องสอน", listed: true },
    StudyArea { code: "vs", asset: "winagsa", name: "Wiang Sa, Nan", name_th: "เวียงสา น่าน", listed: true },
    StudyArea { code: "ms", asset: "measariang", name: "Mae Sariang, Mae Hong Son", name_th: "แม่สะเรียง แม่ฮ่องสอน", listed: true },
    StudyArea { code: "st", asset: "soubtea", name: "Sob Tia, Chiang Mai", name_th: "สบเตี๊ยะ เชียงใหม่", listed: true },
    StudyArea { code: "msr", asset: "mea_sa_riang", name: "Mae Sariang (full)", name_th: "แม่สะเรียง", listed: false },
    StudyArea { code: "fbound", asset: "forest_bound_sgpart", name: "Forest boundary", name_th: "ขอบเขตป่า", listed: false },
];

pub fn find_study_area (code: &str)->Option<&'static StudyArea> {
    STUDY_AREAS.iter().find( |a| a.code == code)
}

pub fn study_area (code: &str)->Result<&'static StudyArea> {
    find_study_area(code).ok_or_else( || GeeError::InvalidArea( code.to_string()))
}

#[derive(Serialize,Debug,Clone,PartialEq)]
pub struct AreaInfo {
    pub name: &'static str,
    pub name_th: &'static str,
}

/// listed areas as `code -> {name, name_th}`, in table order
pub fn listed_areas ()->IndexMap<&'static str,AreaInfo> {
    STUDY_AREAS.iter()
        .filter( |a| a.listed)
        .map( |a| (a.code, AreaInfo { name: a.name, name_th: a.name_th }))
        .collect()
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Palette { Ndvi, Ndmi, Ndwi, Burn, Biomass, Flood }

impl Palette {
    pub fn colors (&self)->&'static [&'static str] {
        match self {
            Palette::Ndvi => &["d7191c", "fdae61", "ffffbf", "a6d96a", "1a9641"],
            Palette::Ndmi => &["e66101", "fdb863", "f7f7f7", "b2abd2", "5e3c99"],
            Palette::Ndwi => &["d01c8b", "f1b6da", "f7f7f7", "b8e186", "4dac26"],
            Palette::Burn => &["4f5bd5", "d62976", "feda75", "feda75"],
            Palette::Biomass => &["5e3c99", "b2abd2", "f7f7f7", "fdb863", "e66101"],
            Palette::Flood => &["0000ff"],
        }
    }

    pub fn to_vec (&self)->Vec<String> {
        self.colors().iter().map( |c| c.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let a = study_area("ud").unwrap();
        assert_eq!( a.asset_id( "projects/ee-sakda-451407/assets/fire/"), "projects/ee-sakda-451407/assets/fire/paktab");

        assert!( study_area("fbound").is_ok()); // unlisted but valid
        match study_area("xx") {
            Err(e) => assert_eq!( e.to_string(), "Invalid area code: xx"),
            Ok(_) => panic!("unknown area accepted")
        }
    }

    #[test]
    fn test_listed() {
        let listed = listed_areas();
        let codes: Vec<&str> = listed.keys().copied().collect();
        assert_eq!( codes, vec!["ud", "mt", "ky", "vs", "ms", "st"]);
        assert_eq!( listed["vs"].name_th, "เวียงสา น่าน");
    }
}
