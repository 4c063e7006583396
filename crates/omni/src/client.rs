//! HTTP side of the OMNI archive: availability, listing request and download.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use darn_common::MapDate;
use futures::StreamExt;
use regex::Regex;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::config::OmniConfig;
use crate::error::{OmniError, OmniResult};
use crate::files::{archive_stale, OmniFiles};
use crate::imf::convert_to_imf;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("compile regex"));

static LISTING_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^"'\s<>]+?\.lst"#).expect("compile regex"));

/// Latest date IMF data is available until, from the availability page.
///
/// The IMF row is the first line mentioning `1963` (start of the record)
/// followed by `IMF`.
pub fn parse_availability(html: &str) -> Option<NaiveDate> {
    html.lines()
        .find(|line| {
            line.find("1963")
                .is_some_and(|pos| line[pos..].contains("IMF"))
        })
        .and_then(|line| {
            ISO_DATE
                .find_iter(line)
                .filter_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
                .max()
        })
}

/// First `.lst` link in a CGI response.
pub fn parse_listing_link(body: &str) -> Option<&str> {
    LISTING_LINK.find(body).map(|m| m.as_str())
}

/// OMNI archive client.
pub struct OmniClient {
    client: Client,
    config: OmniConfig,
}

impl OmniClient {
    pub fn new(config: OmniConfig) -> OmniResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OmniConfig {
        &self.config
    }

    /// Date up to which the archive holds IMF data.
    pub async fn data_availability(&self) -> OmniResult<NaiveDate> {
        let html = self
            .client
            .get(&self.config.availability_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_availability(&html).ok_or_else(|| {
            OmniError::Availability(format!(
                "no IMF availability line on {}",
                self.config.availability_url
            ))
        })
    }

    /// Whether the local OMNI file predates the archive's latest data.
    ///
    /// When the archive cannot be reached the local file is kept.
    pub async fn needs_update(&self, files: &OmniFiles) -> OmniResult<bool> {
        let omni_path = files.omni_path();
        let modified = match fs::metadata(&omni_path).await {
            Ok(meta) => meta.modified()?,
            Err(_) => return Err(OmniError::FileNotFound(omni_path)),
        };

        let available = match self.data_availability().await {
            Ok(date) => date,
            Err(e) => {
                warn!(error = %e, "Could not check OMNI availability, keeping local file");
                return Ok(false);
            }
        };

        // Anything written after the availability day began is current
        let modified = DateTime::<Utc>::from(modified);
        let available = available.and_time(NaiveTime::MIN).and_utc();
        debug!(%modified, %available, "OMNI file age check");
        Ok(modified <= available)
    }

    /// Request the day's listing from the CGI form and download it.
    #[instrument(skip(self, files), fields(date = %files.date()))]
    pub async fn fetch(&self, files: &OmniFiles) -> OmniResult<()> {
        fs::create_dir_all(files.dir()).await?;

        let start = files.start_time();
        let end = files.end_time();
        let form = [
            ("activity", "ftp"),
            ("res", "min"),
            ("spacecraft", "omni_min"),
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
            ("vars", "13"),
            ("vars", "14"),
            ("vars", "17"),
            ("vars", "18"),
            ("submit", "Submit"),
        ];

        info!(url = %self.config.cgi_url, start = %start, end = %end, "Requesting OMNI listing");
        let body = self
            .client
            .post(&self.config.cgi_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let link = parse_listing_link(&body).ok_or(OmniError::ListingNotFound)?;
        let url = if self.config.force_https {
            link.replacen("http://", "https://", 1)
        } else {
            link.to_string()
        };

        self.download(&url, files).await
    }

    /// Download `url` to the OMNI path with retry and exponential backoff.
    async fn download(&self, url: &str, files: &OmniFiles) -> OmniResult<()> {
        let final_path = files.omni_path();
        let temp_path = final_path.with_extension("txt.partial");

        let mut retry_count = 0;
        let mut delay = self.config.initial_retry_delay();

        loop {
            match self.download_once(url, &temp_path).await {
                Ok(bytes) if bytes > 0 => {
                    fs::rename(&temp_path, &final_path).await?;
                    info!(path = %final_path.display(), bytes = bytes, "OMNI download completed");
                    return Ok(());
                }
                Ok(_) => {
                    // An empty listing will not get better on retry
                    fs::remove_file(&temp_path).await.ok();
                    warn!(url = %url, "OMNI listing was empty");
                    break;
                }
                Err(e) => {
                    retry_count += 1;
                    if retry_count > self.config.max_retries {
                        fs::remove_file(&temp_path).await.ok();
                        warn!(error = %e, retries = retry_count - 1, "OMNI download failed");
                        break;
                    }

                    warn!(
                        error = %e,
                        retry = retry_count,
                        max_retries = self.config.max_retries,
                        delay_secs = delay.as_secs(),
                        "OMNI download failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.config.max_retry_delay());
                }
            }
        }

        Err(OmniError::FileNotGenerated {
            filename: files.omni_filename(),
            date: files.date().to_string(),
        })
    }

    async fn download_once(&self, url: &str, temp_path: &Path) -> OmniResult<u64> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let mut file = File::create(temp_path).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    /// Make sure an up-to-date IMF file exists for the date and return its path.
    ///
    /// A missing OMNI file is fetched; a stale one is archived and fetched
    /// again. The listing is then converted.
    pub async fn prepare_imf(&self, files: &OmniFiles, today: MapDate) -> OmniResult<std::path::PathBuf> {
        let update = match self.needs_update(files).await {
            Ok(update) => update,
            Err(OmniError::FileNotFound(_)) => true,
            Err(e) => return Err(e),
        };

        if update {
            if files.omni_path().exists() {
                archive_stale(files, today).await?;
            }
            self.fetch(files).await?;
        }

        convert_to_imf(files).await?;
        Ok(files.imf_path())
    }
}
