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


use udfire_common::{define_error, net::UdfireNetError};
use udfire_server::ApiError;

define_error!{ pub FirmsError =
    NetError( #[from] UdfireNetError) : "{0}",
    HttpError( #[from] reqwest::Error) : "http error: {0}",
    InvalidRegion(String) : "invalid FIRMS region: {0}",
    UnexpectedData(String) : "unexpected FIRMS data: {0}",
    BothSourcesFailed() : "Failed to fetch FIRMS data from both sources",
}

pub type Result<T> = std::result::Result<T, FirmsError>;

impl From<FirmsError> for ApiError {
    fn from (e: FirmsError)->Self {
        match e {
            FirmsError::InvalidRegion(_) => ApiError::validation(e),
            other => ApiError::internal( format!("Error fetching FIRMS data: {other}"))
        }
    }
}
