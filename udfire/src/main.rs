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


//! the UDFire API server. Serves Earth Engine layers under `/gee` and FIRMS hotspots under `/hotspot`.
//! Configs are looked up as `<crate>/<file>.ron` in `--config-dir`, `$UDFIRE_CONFIG_DIR`, `./configs` and
//! the user config dir (in this order)

use std::{net::SocketAddr, path::PathBuf};
use anyhow::Result;
use clap::Parser;
use tracing::info;

use udfire_common::config::set_config_dir;
use udfire_server::{prelude::*, init_tracing};
use udfire_gee::{GeeConfig, GeeService};
use udfire_firms::{FirmsConfig, HotspotService};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "CMU UDFire API server for Earth Engine layers and FIRMS hotspots")]
pub struct Args {
    /// directory with <crate>/<file>.ron config files
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// socket address to listen on (overrides server.ron)
    #[arg(long)]
    pub addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main()->Result<()> {
    init_tracing("info,tower_http=debug");
    let args = Args::parse();

    if let Some(dir) = &args.config_dir {
        set_config_dir( dir)?;
    }

    info!("config dirs: {:?}", udfire_common::config::config_dirs());

    let mut server_config: ServerConfig = udfire_server::load_config("server.ron")?;
    if let Some(addr) = args.addr {
        server_config.sock_addr = addr;
    }
    let gee_config: GeeConfig = udfire_gee::load_config("gee.ron")?;
    let firms_config: FirmsConfig = udfire_firms::load_config("firms.ron")?;

    // no point in serving anything if we can't get to Earth Engine
    let gee = GeeService::initialize( gee_config).await?;
    let hotspot = HotspotService::new( firms_config)?;

    let services = ApiServiceListBuilder::new()
        .add( build_service!( gee => gee))
        .add( build_service!( hotspot => hotspot))
        .build();

    ApiServer::new( server_config, services).serve().await?;
    Ok(())
}
