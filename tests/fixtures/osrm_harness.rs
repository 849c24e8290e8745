//! OSRM test harness: dataset preparation and container startup.
//!
//! Downloads a Geofabrik extract and preprocesses it with the OSRM docker
//! tooling (MLD pipeline), then starts `osrm-routed` in a reusable
//! container. Only the directions integration tests need any of this.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

/// Geofabrik region path, e.g. "north-america/us/nevada".
#[derive(Debug, Clone)]
pub struct Region {
    pub path: String,
}

impl Region {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> String {
        self.path.split('/').next_back().unwrap_or("region").to_string()
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

/// Ensures the extract is downloaded and OSRM-preprocessed, returning the
/// data directory to mount into the routing container.
pub fn ensure_dataset(region: &Region, data_root: &Path) -> Result<PathBuf, String> {
    let data_dir = data_root.join(region.name());
    fs::create_dir_all(&data_dir).map_err(|e| e.to_string())?;

    let pbf_path = data_dir.join(format!("{}-latest.osm.pbf", region.name()));
    if !pbf_path.exists() {
        download(&region.url(), &pbf_path)?;
    }

    let osrm_base = data_dir.join(format!("{}-latest.osrm", region.name()));
    if !osrm_base.exists() {
        run_osrm_tool(
            &["osrm-extract", "-p", "/opt/car.lua", &format!("/data/{}", file_name(&pbf_path))],
            &data_dir,
        )?;
    }

    let partition = osrm_base.with_extension("osrm.partition");
    if !partition.exists() {
        run_osrm_tool(
            &["osrm-partition", &format!("/data/{}", file_name(&osrm_base))],
            &data_dir,
        )?;
        run_osrm_tool(
            &["osrm-customize", &format!("/data/{}", file_name(&osrm_base))],
            &data_dir,
        )?;
    }

    Ok(data_dir)
}

/// Starts `osrm-routed` over a prepared dataset; returns the container and
/// its base URL.
pub fn start_router(
    region: &Region,
    data_dir: &Path,
) -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(
            data_dir.to_string_lossy().to_string(),
            "/data",
        ))
        .with_cmd(vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            format!("/data/{}-latest.osrm", region.name()),
        ])
        .with_container_name(format!("osrm-{}-mld", region.name()))
        .with_startup_timeout(std::time::Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

fn download(url: &str, dest: &Path) -> Result<(), String> {
    let response = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| e.to_string())?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path).map_err(|e| e.to_string())?);
    let bytes = response.bytes().map_err(|e| e.to_string())?;
    writer.write_all(&bytes).map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())?;
    fs::rename(tmp_path, dest).map_err(|e| e.to_string())?;
    Ok(())
}

fn run_osrm_tool(args: &[&str], data_dir: &Path) -> Result<(), String> {
    let status = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-t")
        .arg("-v")
        .arg(format!("{}:/data", data_dir.display()))
        .arg("osrm/osrm-backend")
        .args(args)
        .status()
        .map_err(|e| e.to_string())?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("docker exited with status {}", status))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
