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


//! string utilities

use std::env;
use regex::{Regex,Captures};
use lazy_static::lazy_static;

lazy_static! {
    static ref ENV_VAR_RE: Regex = Regex::new( r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

/// replace all `${NAME}` occurrences in `s` with the value of the respective environment variable.
/// Unset variables are replaced with an empty string
pub fn env_expand (s: &str)->String {
    if !s.contains("${") { return s.to_string() }

    ENV_VAR_RE.replace_all( s, |caps: &Captures| {
        env::var( &caps[1]).unwrap_or_default()
    }).into_owned()
}

/// same as [`env_expand`] but for optional strings that should end up as `None` if the expansion is empty
pub fn env_expand_opt (s: &Option<String>)->Option<String> {
    s.as_ref().map( |s| env_expand(s)).filter( |s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_refs() {
        assert_eq!( env_expand("plain/path/file.ron"), "plain/path/file.ron");
        assert_eq!( env_expand("$HOME without braces"), "$HOME without braces");
    }

    #[test]
    fn test_unset_var() {
        assert_eq!( env_expand("a${UDFIRE_SURELY_NOT_SET_12345}b"), "ab");
        assert_eq!( env_expand_opt( &Some("${UDFIRE_SURELY_NOT_SET_12345}".to_string())), None);
    }
}
