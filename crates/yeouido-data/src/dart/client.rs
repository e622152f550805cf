//! OpenDART-style disclosure API client with rate limiting.

use crate::dart::DisclosureSource;
use crate::dart::filings::{Filing, FilingPeriod, ReportingScope, StatementRow};
use crate::error::{DataError, Result};
use crate::record::FiscalQuarter;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Disclosure API base URL
const DART_BASE_URL: &str = "https://opendart.fss.or.kr/api";

/// Default minimum interval between requests
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(200);

/// Maximum page size accepted by the listing endpoint
const PAGE_COUNT: u32 = 100;

/// Status code for a successful response
const STATUS_OK: &str = "000";

/// Status code for "no data for this query"
const STATUS_NO_DATA: &str = "013";

/// Listing response from `list.json`
#[derive(Debug, Deserialize)]
struct ListResponse {
    status: String,
    message: String,
    #[serde(default)]
    total_page: u32,
    #[serde(default)]
    list: Vec<ListItem>,
}

/// One filing in a listing response
#[derive(Debug, Deserialize)]
struct ListItem {
    corp_code: String,
    corp_name: String,
    #[serde(default)]
    stock_code: Option<String>,
    report_nm: String,
    rcept_no: String,
    rcept_dt: String,
}

impl ListItem {
    fn into_filing(self) -> Result<Filing> {
        let receipt_date = NaiveDate::parse_from_str(&self.rcept_dt, "%Y%m%d").map_err(|e| {
            DataError::Parse(format!("Invalid receipt date {}: {}", self.rcept_dt, e))
        })?;
        let stock_code = self.stock_code.filter(|code| !code.trim().is_empty());

        Ok(Filing {
            company_id: self.corp_code,
            company_name: self.corp_name.trim().to_string(),
            stock_code,
            report_title: self.report_nm.trim().to_string(),
            receipt_id: self.rcept_no,
            receipt_date,
        })
    }
}

/// Statement response from `fnlttSinglAcntAll.json`
#[derive(Debug, Deserialize)]
struct StatementResponse {
    status: String,
    message: String,
    #[serde(default)]
    list: Vec<StatementItem>,
}

/// One account row in a statement response
#[derive(Debug, Deserialize)]
struct StatementItem {
    sj_div: String,
    account_nm: String,
    #[serde(default)]
    thstrm_amount: Option<String>,
    #[serde(default)]
    frmtrm_amount: Option<String>,
}

/// Report code for the statement endpoint.
const fn report_code(quarter: FiscalQuarter) -> &'static str {
    match quarter {
        FiscalQuarter::Q1 => "11013",
        FiscalQuarter::Q2 => "11012",
        FiscalQuarter::Q3 => "11014",
        FiscalQuarter::Q4 => "11011",
    }
}

/// Map an API body status onto a result; `Ok(false)` means "no data".
fn check_status(status: &str, message: &str) -> Result<bool> {
    match status {
        STATUS_OK => Ok(true),
        STATUS_NO_DATA => Ok(false),
        _ => Err(DataError::Api {
            status: status.to_string(),
            message: message.to_string(),
        }),
    }
}

/// Rate limiter to keep the client under the API's request budget
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// Disclosure API client with rate limiting
pub struct DartClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for DartClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DartClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl DartClient {
    /// Create a new client with the default endpoint and rate limit.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_rate_limit(api_key, DEFAULT_RATE_LIMIT)
    }

    /// Create a new client with a custom minimum interval between requests.
    ///
    /// # Example
    /// ```no_run
    /// use yeouido_data::DartClient;
    /// use std::time::Duration;
    ///
    /// # fn example() -> yeouido_data::Result<()> {
    /// // 2 requests per second
    /// let client = DartClient::with_rate_limit("api-key", Duration::from_millis(500))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_rate_limit(api_key: impl Into<String>, min_interval: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
            api_key: api_key.into(),
            base_url: DART_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Issue a rate-limited GET and decode the JSON body.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch {}: HTTP {}",
                endpoint,
                response.status()
            )));
        }

        response.json().await.map_err(DataError::Network)
    }

    /// List periodic filings received between `start` and `end` (inclusive).
    ///
    /// Follows pagination until every page has been read. Rows with an
    /// unparseable receipt date are skipped.
    pub async fn get_filings(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Filing>> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let bgn_de = start.format("%Y%m%d").to_string();
        let end_de = end.format("%Y%m%d").to_string();
        let page_count = PAGE_COUNT.to_string();

        let mut filings = Vec::new();
        let mut page_no = 1u32;
        loop {
            let page = page_no.to_string();
            let response: ListResponse = self
                .get_json(
                    "list.json",
                    &[
                        ("bgn_de", bgn_de.as_str()),
                        ("end_de", end_de.as_str()),
                        ("pblntf_ty", "A"),
                        ("page_no", page.as_str()),
                        ("page_count", page_count.as_str()),
                    ],
                )
                .await?;

            if !check_status(&response.status, &response.message)? {
                break;
            }

            for item in response.list {
                match item.into_filing() {
                    Ok(filing) => filings.push(filing),
                    Err(e) => debug!(error = %e, "skipping listing row"),
                }
            }

            if page_no >= response.total_page {
                break;
            }
            page_no += 1;
        }

        debug!(count = filings.len(), %start, %end, "listed filings");
        Ok(filings)
    }

    /// Fetch every account row of one statement set.
    ///
    /// Returns an empty list when the API has no statement for the period.
    pub async fn get_statement(
        &self,
        company_id: &str,
        period: FilingPeriod,
        scope: ReportingScope,
    ) -> Result<Vec<StatementRow>> {
        if company_id.is_empty() {
            return Err(DataError::Parse("Empty company identifier".to_string()));
        }

        let year = period.fiscal_year.to_string();
        let response: StatementResponse = self
            .get_json(
                "fnlttSinglAcntAll.json",
                &[
                    ("corp_code", company_id),
                    ("bsns_year", year.as_str()),
                    ("reprt_code", report_code(period.fiscal_quarter)),
                    ("fs_div", scope.code()),
                ],
            )
            .await?;

        if !check_status(&response.status, &response.message)? {
            return Ok(Vec::new());
        }

        Ok(response
            .list
            .into_iter()
            .map(|item| StatementRow {
                statement: item.sj_div,
                account_name: item.account_nm,
                scope,
                current_amount: item.thstrm_amount,
                prior_amount: item.frmtrm_amount,
            })
            .collect())
    }
}

impl DisclosureSource for DartClient {
    async fn list_filings(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Filing>> {
        self.get_filings(start, end).await
    }

    async fn fetch_statement(
        &self,
        company_id: &str,
        period: FilingPeriod,
        scope: ReportingScope,
    ) -> Result<Vec<StatementRow>> {
        self.get_statement(company_id, period, scope).await
    }
}
