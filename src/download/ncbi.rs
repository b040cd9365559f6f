/// NCBI taxdump retrieval: listing, download and extraction
use crate::bio::taxdump::{TaxdumpDir, NODES_FILE};
use crate::storage::{build_database, IngestSummary};
use crate::{Result, TaxaError};
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tar::Archive;
use url::Url;

pub const NEW_TAXDUMP_PAGE: &str = "https://ftp.ncbi.nih.gov/pub/taxonomy/new_taxdump/";
pub const TAXDUMP_ARCHIVE_PAGE: &str = "https://ftp.ncbi.nih.gov/pub/taxonomy/taxdump_archive/";

const HREF_PATTERN: &str = r#"(?i)href\s*=\s*["']([^"']+)["']"#;

/// Dump archives currently published by NCBI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxdumpListing {
    pub latest: Vec<String>,
    pub archive: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Absolute URLs of every `.zip`/`.tar.gz` link on a directory listing page
pub fn parse_listing(html: &str, base: &Url) -> Result<Vec<String>> {
    let href = Regex::new(HREF_PATTERN)
        .map_err(|e| TaxaError::Parse(format!("listing pattern: {}", e)))?;
    Ok(href
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|href| {
            let href = href.to_ascii_lowercase();
            href.ends_with(".zip") || href.ends_with(".tar.gz")
        })
        .filter_map(|href| {
            let file_name = href.rsplit('/').next().unwrap_or(href);
            base.join(file_name).ok()
        })
        .map(|url| url.to_string())
        .collect())
}

fn archive_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or("taxdump.tar.gz")
        .to_string()
}

pub struct TaxdumpClient {
    client: reqwest::blocking::Client,
}

impl TaxdumpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("taxaquery/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(1800))
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(TaxaError::Network(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }
        Ok(response)
    }

    pub fn fetch_listing(&self, page: &str) -> Result<Vec<String>> {
        let base = Url::parse(page)
            .map_err(|e| TaxaError::Config(format!("invalid listing URL {}: {}", page, e)))?;
        let html = self.get(page)?.text()?;
        let urls = parse_listing(&html, &base)?;
        tracing::debug!("{} archives listed at {}", urls.len(), page);
        Ok(urls)
    }

    pub fn list_taxdump_urls(&self) -> Result<TaxdumpListing> {
        Ok(TaxdumpListing {
            latest: self.fetch_listing(NEW_TAXDUMP_PAGE)?,
            archive: self.fetch_listing(TAXDUMP_ARCHIVE_PAGE)?,
        })
    }

    /// Stream `url` into `dest_dir`, returning the written file
    pub fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let parsed = Url::parse(url)
            .map_err(|e| TaxaError::Config(format!("invalid taxonomy URL {}: {}", url, e)))?;
        let target = dest_dir.join(archive_file_name(&parsed));

        tracing::info!("Downloading {}", url);
        let response = self.get(url)?;

        let pb = match response.content_length() {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("[{elapsed_precise}] {spinner:.green} {bytes} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
        };
        pb.set_message(archive_file_name(&parsed));

        let mut reader = pb.wrap_read(response);
        let mut writer = BufWriter::new(File::create(&target)?);
        let written = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        pb.finish_and_clear();

        tracing::info!("Downloaded {} bytes to {}", written, target.display());
        Ok(target)
    }

    /// Download, extract and ingest `url` into a fresh store at `db_path`
    pub fn build_from_url(&self, url: &str, db_path: &Path) -> Result<IngestSummary> {
        let workdir = tempfile::tempdir()?;
        let archive = self.download(url, workdir.path())?;

        let extract_dir = workdir.path().join("taxdump");
        extract_archive(&archive, &extract_dir)?;

        let dump = TaxdumpDir::new(find_dump_root(&extract_dir)?).read()?;
        build_database(db_path, &dump, Some(url))
    }
}

/// Unpack a `.tar.gz` in process; `.zip` goes through the system `unzip`
pub fn extract_archive(archive: &Path, dest_dir: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let kind = ArchiveKind::from_name(&name).ok_or_else(|| {
        TaxaError::Config(format!("unsupported archive type: {}", archive.display()))
    })?;

    fs::create_dir_all(dest_dir)?;
    tracing::info!("Extracting {}", archive.display());

    match kind {
        ArchiveKind::TarGz => {
            let gz = GzDecoder::new(File::open(archive)?);
            Archive::new(gz).unpack(dest_dir)?;
        }
        ArchiveKind::Zip => {
            let output = Command::new("unzip")
                .arg("-q")
                .arg("-o")
                .arg(archive)
                .arg("-d")
                .arg(dest_dir)
                .output()?;
            if !output.status.success() {
                return Err(TaxaError::Other(format!(
                    "Failed to extract {}: {}",
                    archive.display(),
                    String::from_utf8_lossy(&output.stderr)
                )));
            }
        }
    }
    Ok(())
}

/// Directory holding nodes.dmp: `dir` itself or one of its direct children
pub fn find_dump_root(dir: &Path) -> Result<PathBuf> {
    if dir.join(NODES_FILE).exists() {
        return Ok(dir.to_path_buf());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() && path.join(NODES_FILE).exists() {
            return Ok(path);
        }
    }
    Err(TaxaError::NotFound(format!(
        "{} under {}",
        NODES_FILE,
        dir.display()
    )))
}
