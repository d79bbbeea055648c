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


//! runtime lookup of RON config files
//!
//! Each crate that defines config structs expands `define_load_config!{}` at its top level, which gives it a
//! `load_config(filename)` function. Config files are looked up as `<dir>/<crate-name>/<filename>` in the
//! following dirs (first match wins):
//!
//!   1. the dir explicitly set with [`set_config_dir`] (e.g. from a `--config-dir` command line option)
//!   2. `$UDFIRE_CONFIG_DIR`
//!   3. `./configs`
//!   4. the user config dir (e.g. `~/.config/udfire` on Linux)
//!
//! File contents are env-expanded (`${VAR}`) before they get deserialized, which is how secrets
//! such as API keys are kept out of config files

use std::{env, path::{Path,PathBuf}, sync::OnceLock};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{define_error, fs, strings::env_expand};

pub const CONFIG_DIR_ENV: &str = "UDFIRE_CONFIG_DIR";
pub const LOCAL_CONFIG_DIR: &str = "configs";

define_error!{ pub ConfigError =
    NotFound(String) : "config file not found: {0}",
    ConfigDirAlreadySet(PathBuf) : "config dir already set, ignoring {0:?}",
    IOError(#[from] std::io::Error) : "IO error: {0}",
    RonError(#[from] ron::error::SpannedError) : "RON error: {0}"
}

pub type Result<T> = std::result::Result<T, ConfigError>;

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// set the primary config dir. This can only be called once, before the first config is loaded
pub fn set_config_dir (dir: impl AsRef<Path>)->Result<()> {
    let dir = dir.as_ref().to_path_buf();
    CONFIG_DIR.set(dir).map_err( |dir| ConfigError::ConfigDirAlreadySet(dir))
}

/// the ordered list of dirs we search for `<resource_crate>/<filename>` config files
pub fn config_dirs ()->Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(4);

    if let Some(dir) = CONFIG_DIR.get() { dirs.push( dir.clone()) }
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) { if !dir.is_empty() { dirs.push( PathBuf::from(dir)) } }
    dirs.push( PathBuf::from(LOCAL_CONFIG_DIR));
    if let Some(pd) = ProjectDirs::from( "", "", "udfire") { dirs.push( pd.config_dir().to_path_buf()) }

    dirs
}

pub fn find_config_file (resource_crate: &str, filename: &str)->Option<PathBuf> {
    fs::first_existing_file( config_dirs().iter().map( |dir| dir.join(resource_crate).join(filename)))
}

/// load and deserialize an env-expanded RON config file for the given crate
pub fn load_config<C> (resource_crate: &str, filename: &str)->Result<C> where C: DeserializeOwned {
    let path = find_config_file( resource_crate, filename).ok_or_else( || ConfigError::NotFound(format!("{resource_crate}/{filename}")))?;
    debug!("loading config {:?}", path);
    load_config_file( &path)
}

pub fn load_config_file<C> (path: impl AsRef<Path>)->Result<C> where C: DeserializeOwned {
    let contents = fs::filepath_contents_as_string( &path.as_ref())?;
    config_from_str( &contents)
}

/// deserialize env-expanded RON text
pub fn config_from_str<C> (s: &str)->Result<C> where C: DeserializeOwned {
    let s = env_expand(s);
    Ok( ron::from_str( &s)? )
}

/// this is the macro that needs to be expanded at the top of crates (lib.rs) that define configs.
/// Config users call the defined `load_config(..)` function to instantiate config structs
#[macro_export]
macro_rules! define_load_config {
    () => {
        /// load config `filename` for this crate (see `udfire_common::config` for lookup rules)
        pub fn load_config<C> (filename: &str) -> udfire_common::config::Result<C> where C: serde::de::DeserializeOwned {
            udfire_common::config::load_config( env!("CARGO_PKG_NAME"), filename)
        }
    }
}
pub use define_load_config;
