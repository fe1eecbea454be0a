use crate::io::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::warn;

/// Download endpoint serving legacy-format entries by identifier.
pub const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download/";

const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Transport seam used by [`Retriever`].
///
/// Implementations return the response body on success or a human-readable
/// failure reason; the retriever owns the retry policy.
pub trait NetworkFetch {
    fn get(&self, url: &str) -> Result<Vec<u8>, String>;
}

/// Blocking HTTP transport with a per-request timeout.
pub struct HttpFetch {
    client: reqwest::blocking::Client,
}

impl HttpFetch {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { client })
    }
}

impl NetworkFetch for HttpFetch {
    fn get(&self, url: &str) -> Result<Vec<u8>, String> {
        let resp = self.client.get(url).send().map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("request failed with status {}", resp.status()));
        }
        resp.bytes()
            .map(|body| body.to_vec())
            .map_err(|e| e.to_string())
    }
}

/// Fetches remote structure entries with bounded retries.
///
/// Each attempt issues one network call; the payload is written to the
/// destination only after a successful response. Attempts are separated by a
/// fixed delay.
pub struct Retriever<F> {
    transport: F,
    max_retries: u32,
    retry_delay: Duration,
}

impl<F: NetworkFetch> Retriever<F> {
    pub fn new(transport: F, max_retries: u32) -> Self {
        Self {
            transport,
            max_retries: max_retries.max(1),
            retry_delay: RETRY_DELAY,
        }
    }

    /// Overrides the inter-attempt delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Downloads the entry for `id` into `dest`.
    ///
    /// The identifier is uppercased to form the archive URL. Fails with
    /// [`Error::Download`] once every allowed attempt has been exhausted.
    pub fn fetch(&self, id: &str, dest: &Path) -> Result<(), Error> {
        let url = format!("{}{}.pdb", RCSB_DOWNLOAD_URL, id.to_ascii_uppercase());
        let mut last_reason = String::from("no attempts made");

        for attempt in 1..=self.max_retries {
            match self.transport.get(&url) {
                Ok(body) => {
                    fs::write(dest, body).map_err(|e| Error::from_io(e, dest))?;
                    return Ok(());
                }
                Err(reason) => {
                    warn!(
                        "download attempt {}/{} for '{}' failed: {}",
                        attempt, self.max_retries, id, reason
                    );
                    last_reason = reason;
                    if attempt < self.max_retries {
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        Err(Error::download(id, self.max_retries, last_reason))
    }
}

/// Builds a retriever backed by the public archive endpoint.
pub fn rcsb_retriever(max_retries: u32, timeout: Duration) -> Result<Retriever<HttpFetch>, Error> {
    let transport = HttpFetch::new(timeout)
        .map_err(|reason| Error::download("<client>", 0, reason))?;
    Ok(Retriever::new(transport, max_retries))
}
