//! Prepares an OSRM routing dataset (download + extract + MLD preprocessing)
//! for running a local routing backend.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

/// Geofabrik extract covering Delhi NCR.
pub const NCR_REGION: &str = "asia/india/northern-zone";

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(thiserror::Error, Debug)]
pub enum RoutingDataError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{step} failed: {status}")]
    Preprocess { step: String, status: String },
}

#[derive(Debug, Clone)]
pub struct RoutingRegion {
    /// Geofabrik region path, e.g. "asia/india/northern-zone".
    pub path: String,
}

impl RoutingRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn ncr() -> Self {
        Self::new(NCR_REGION)
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("region")
    }

    pub fn download_url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

#[derive(Debug, Clone)]
pub struct RoutingDataConfig {
    pub region: RoutingRegion,
    pub data_root: PathBuf,
    /// Lua profile inside the OSRM image.
    pub profile: String,
}

impl RoutingDataConfig {
    pub fn new(region: RoutingRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            profile: "/opt/car.lua".to_string(),
        }
    }
}

/// Files of a prepared dataset.
#[derive(Debug, Clone)]
pub struct RoutingDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
}

impl RoutingDataset {
    /// Download and preprocess whatever is missing under `data_root/<region>`.
    pub fn ensure(config: &RoutingDataConfig) -> Result<Self, RoutingDataError> {
        let region_name = config.region.name();
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let data_dir = data_root.join(region_name);
        fs::create_dir_all(&data_dir)?;

        let pbf_path = data_dir.join(format!("{region_name}-latest.osm.pbf"));
        if !pbf_path.exists() {
            tracing::info!(url = %config.region.download_url(), "downloading OSM extract");
            download(&config.region.download_url(), &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{region_name}-latest.osrm"));
        if !osrm_base.exists() {
            let input = container_path(&pbf_path);
            run_osrm_step(&["osrm-extract", "-p", &config.profile, &input], &data_dir)?;
        }

        if !mld_ready(&osrm_base) {
            let input = container_path(&osrm_base);
            run_osrm_step(&["osrm-partition", &input], &data_dir)?;
            run_osrm_step(&["osrm-customize", &input], &data_dir)?;
        }

        Ok(Self {
            data_dir,
            osrm_base,
            pbf_path,
        })
    }

    /// Path of the dataset as mounted at /data inside the container.
    pub fn container_osrm_path(&self) -> String {
        container_path(&self.osrm_base)
    }

    /// Seconds since the epoch when the MLD partition was written, 0 if it
    /// is missing.
    pub fn prepared_at(&self) -> u64 {
        fs::metadata(self.osrm_base.with_extension("osrm.partition"))
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|time| time.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|age| age.as_secs())
            .unwrap_or(0)
    }

    /// Name for a reusable `osrm-routed` container. Changes whenever the
    /// dataset is re-prepared so a stale container is never reused.
    pub fn container_name(&self) -> String {
        let region = self
            .data_dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("region");
        format!("osrm-{region}-mld-{}", self.prepared_at())
    }

    /// Command line for serving this dataset with `osrm-routed`.
    pub fn routed_command(&self) -> Vec<String> {
        vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            self.container_osrm_path(),
        ]
    }
}

fn download(url: &str, dest: &Path) -> Result<(), RoutingDataError> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&response.bytes()?)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|ext| osrm_base.with_extension(ext).exists())
        && osrm_base.exists()
}

fn run_osrm_step(args: &[&str], data_dir: &Path) -> Result<(), RoutingDataError> {
    tracing::info!(step = args[0], "running OSRM preprocessing");
    let status = Command::new("docker")
        .args(["run", "--rm", "-t", "-v"])
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(RoutingDataError::Preprocess {
            step: args[0].to_string(),
            status: status.to_string(),
        })
    }
}

fn container_path(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    format!("/data/{name}")
}
