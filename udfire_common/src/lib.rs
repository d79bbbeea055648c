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


//! common utilities shared by the UDFire crates: declarative macros, string/date/file helpers,
//! HTTP client functions and the lookup mechanism for RON config files

pub mod macros;
pub mod strings;
pub mod fs;
pub mod datetime;
pub mod net;
pub mod config;

/// inclusive range check that also gives us a uniform error message for query parameter validation
pub fn check_range<T> (name: &str, v: T, min: T, max: T)->Result<T,String> where T: PartialOrd + std::fmt::Display + Copy {
    if v < min || v > max {
        Err( format!("{name} must be between {min} and {max} (got {v})"))
    } else {
        Ok(v)
    }
}
