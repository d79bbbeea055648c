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


use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;
use parse_duration::parse;

/// the only calendar date format we accept in queries and configs
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }

/// the current local calendar date (this is what dashboard users consider "today")
#[inline]
pub fn today ()->NaiveDate {
    Local::now().date_naive()
}

/// parse a strict `YYYY-MM-DD` date
pub fn parse_date (s: &str)->Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 10 { return None } // chrono would accept non-padded fields

    NaiveDate::parse_from_str( s, DATE_FORMAT).ok()
}

pub fn format_date (date: &NaiveDate)->String {
    date.format(DATE_FORMAT).to_string()
}

/// calendar date `n` days before `date`, saturating at the earliest representable date
pub fn days_before (date: NaiveDate, n: u32)->NaiveDate {
    date.checked_sub_days( Days::new(n as u64)).unwrap_or(NaiveDate::MIN)
}

/// parse an optional date spec, returning `Ok(None)` if there was no spec and `Err(spec)` if it was malformed
pub fn parse_optional_date (spec: &Option<String>)->Result<Option<NaiveDate>,String> {
    match spec.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some).ok_or_else( || s.to_string())
    }
}

//--- support for serde

pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    let dfm = format!("{}s", dur.as_secs_f64());
    s.serialize_str(&dfm)
}
