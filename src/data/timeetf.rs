//! Holdings download from the fund's daily PDF ("portfolio deposit file") export.

use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, info};
use reqwest::blocking::Client;

use crate::data::SnapshotSource;
use crate::domain::Snapshot;
use crate::error::{AppError, Unavailable};
use crate::io::ingest::read_workbook;

pub const DEFAULT_BASE_URL: &str = "https://timeetf.co.kr/pdf_excel.php";
pub const DEFAULT_FUND_IDX: u32 = 2;

const USER_AGENT: &str = "Mozilla/5.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Bodies at or below this size are the site's "no file" placeholder, not a workbook.
const MIN_WORKBOOK_BYTES: usize = 1000;

pub struct TimeEtfClient {
    client: Client,
    base_url: String,
    fund_idx: u32,
}

impl TimeEtfClient {
    pub fn new(base_url: impl Into<String>, fund_idx: u32) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            fund_idx,
        })
    }

    fn fetch_bytes(&self, date: NaiveDate) -> Result<Vec<u8>, Unavailable> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let idx = self.fund_idx.to_string();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("idx", idx.as_str()), ("cate", ""), ("pdfDate", date_str.as_str())])
            .send()
            .map_err(|e| Unavailable::Fetch(format!("request for {date} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            debug!("{date}: HTTP {status}");
            return Err(Unavailable::NotPublished);
        }

        let body = resp
            .bytes()
            .map_err(|e| Unavailable::Fetch(format!("reading body for {date} failed: {e}")))?;

        if !is_workbook_sized(body.len()) {
            debug!("{date}: body too small ({} bytes)", body.len());
            return Err(Unavailable::NotPublished);
        }

        Ok(body.to_vec())
    }
}

impl SnapshotSource for TimeEtfClient {
    fn fetch(&self, date: NaiveDate) -> Result<Snapshot, Unavailable> {
        let bytes = self.fetch_bytes(date)?;
        info!("Downloaded holdings for {date} ({} bytes).", bytes.len());
        read_workbook(date, &bytes)
    }
}

fn is_workbook_sized(len: usize) -> bool {
    len > MIN_WORKBOOK_BYTES
}
