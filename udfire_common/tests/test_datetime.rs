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

use chrono::NaiveDate;
use udfire_common::datetime::*;

#[test]
fn test_parse_date() {
    assert_eq!( parse_date("2024-12-31"), NaiveDate::from_ymd_opt(2024, 12, 31));
    assert_eq!( parse_date(" 2024-01-05 "), NaiveDate::from_ymd_opt(2024, 1, 5));

    assert!( parse_date("2024-1-5").is_none());
    assert!( parse_date("2024-02-30").is_none());
    assert!( parse_date("31.12.2024").is_none());
    assert!( parse_date("").is_none());
}

#[test]
fn test_optional_date() {
    assert_eq!( parse_optional_date(&None), Ok(None));
    assert_eq!( parse_optional_date(&Some("".to_string())), Ok(None));
    assert_eq!( parse_optional_date(&Some("2024-03-01".to_string())), Ok(NaiveDate::from_ymd_opt(2024, 3, 1)));
    assert_eq!( parse_optional_date(&Some("yesterday".to_string())), Err("yesterday".to_string()));
}

#[test]
fn test_day_arithmetic() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!( format_date( &days_before(d, 30)), "2024-01-31"); // leap year
    assert_eq!( days_before(d, 0), d);
}

#[test]
fn test_duration_de() {
    #[derive(serde::Deserialize)]
    struct C {
        #[serde(deserialize_with="deserialize_duration")]
        timeout: std::time::Duration
    }

    let c: C = ron::from_str(r#"( timeout: "30s" )"#).unwrap();
    assert_eq!( c.timeout, secs(30));

    let c: C = ron::from_str(r#"( timeout: "2m" )"#).unwrap();
    assert_eq!( c.timeout, secs(120));
}
