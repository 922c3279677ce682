//! Blocking HTTP clients for the admin and data planes

use crate::chunks::ChunkMerger;
use crate::wire::{
    self, decode_stream, error_from_response, ListTablesResponse, MutateRowsResponse,
    ReadRowsResponse, SampleRowKeysResponse, TableResource,
};
use hellotable_core::{
    check_bulk_shape, AdminClient, DataClient, Error, Mutation, Result, Row, RowError, RowFilter,
    RowKey, RowSet, SampleKey, TableInfo,
};
use hellotable_options::ConnectOptions;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

const ROUTING_HEADER: &str = "x-goog-request-params";

/// Shared HTTP plumbing: authentication, routing header, error decoding
#[derive(Debug, Clone)]
struct Transport {
    http: Client,
}

impl Transport {
    fn new(opts: &ConnectOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        match &opts.access_token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| Error::InvalidArgument(format!("access token: {}", e)))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => warn!("no access token configured; requests are sent unauthenticated"),
        }
        let http = Client::builder()
            .timeout(opts.timeout)
            .user_agent(opts.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { http })
    }

    /// Send and return the body of a successful response
    fn send(&self, request: RequestBuilder, routing: Option<String>) -> Result<String> {
        let request = match routing {
            Some(params) => request.header(ROUTING_HEADER, params),
            None => request,
        };
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                Error::Unavailable(format!("request timed out: {}", e))
            } else {
                Error::Transport(e.to_string())
            }
        })?;
        let status = response.status();
        let body = response.text().map_err(|e| Error::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        routing: Option<String>,
    ) -> Result<T> {
        let body = self.send(request, routing)?;
        serde_json::from_str(&body).map_err(|e| Error::Protocol(e.to_string()))
    }

    fn send_stream<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        routing: Option<String>,
    ) -> Result<Vec<T>> {
        let body = self.send(request, routing)?;
        Ok(decode_stream(&body)?)
    }
}

fn ensure_open(closed: &AtomicBool) -> Result<()> {
    if closed.load(Ordering::Acquire) {
        return Err(Error::Closed);
    }
    Ok(())
}

fn close_once(closed: &AtomicBool) -> Result<()> {
    if closed.swap(true, Ordering::AcqRel) {
        return Err(Error::Closed);
    }
    Ok(())
}

/// Admin-plane client: `<admin_endpoint>/v2/projects/<p>/instances/<i>/...`
#[derive(Debug)]
pub struct RestAdminClient {
    transport: Transport,
    instance_url: String,
    instance_path: String,
    closed: AtomicBool,
}

impl RestAdminClient {
    /// Build the HTTP client; no request is sent until the first call.
    pub fn new(opts: &ConnectOptions) -> Result<Self> {
        let instance_path = opts.instance_path();
        Ok(Self {
            transport: Transport::new(opts)?,
            instance_url: format!(
                "{}/v2/{}",
                opts.admin_endpoint.trim_end_matches('/'),
                instance_path
            ),
            instance_path,
            closed: AtomicBool::new(false),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/tables/{}", self.instance_url, table)
    }

    fn table_routing(&self, table: &str) -> Option<String> {
        Some(wire::routing_header(
            "name",
            &format!("{}/tables/{}", self.instance_path, table),
        ))
    }
}

impl AdminClient for RestAdminClient {
    fn tables(&self) -> Result<Vec<String>> {
        ensure_open(&self.closed)?;
        let url = format!("{}/tables", self.instance_url);
        let routing = Some(wire::routing_header("parent", &self.instance_path));
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .transport
                .http
                .get(&url)
                .query(&[("view", "NAME_ONLY")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let page: ListTablesResponse = self.transport.send_json(request, routing.clone())?;
            names.extend(wire::table_names(&page));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!(count = names.len(), "listed tables");
        Ok(names)
    }

    fn create_table(&self, table: &str) -> Result<()> {
        ensure_open(&self.closed)?;
        let request = self
            .transport
            .http
            .post(format!("{}/tables", self.instance_url))
            .json(&wire::create_table_request(table));
        let routing = Some(wire::routing_header("parent", &self.instance_path));
        self.transport.send(request, routing).map(|_| ())
    }

    fn table_info(&self, table: &str) -> Result<TableInfo> {
        ensure_open(&self.closed)?;
        let request = self
            .transport
            .http
            .get(self.table_url(table))
            .query(&[("view", "SCHEMA_VIEW")]);
        let resource: TableResource = self.transport.send_json(request, self.table_routing(table))?;
        Ok(wire::table_info(&resource))
    }

    fn create_column_family(&self, table: &str, family: &str) -> Result<()> {
        ensure_open(&self.closed)?;
        let request = self
            .transport
            .http
            .post(format!("{}:modifyColumnFamilies", self.table_url(table)))
            .json(&wire::create_family_request(family));
        self.transport
            .send(request, self.table_routing(table))
            .map(|_| ())
    }

    fn drop_row_range(&self, table: &str, prefix: &[u8]) -> Result<()> {
        ensure_open(&self.closed)?;
        let request = self
            .transport
            .http
            .post(format!("{}:dropRowRange", self.table_url(table)))
            .json(&wire::drop_row_range_request(prefix));
        self.transport
            .send(request, self.table_routing(table))
            .map(|_| ())
    }

    fn delete_table(&self, table: &str) -> Result<()> {
        ensure_open(&self.closed)?;
        let request = self.transport.http.delete(self.table_url(table));
        self.transport
            .send(request, self.table_routing(table))
            .map(|_| ())
    }

    fn close(&self) -> Result<()> {
        close_once(&self.closed)
    }
}

/// Data-plane client: `<data_endpoint>/v2/projects/<p>/instances/<i>/tables/<t>:<method>`
#[derive(Debug)]
pub struct RestDataClient {
    transport: Transport,
    endpoint: String,
    opts: ConnectOptions,
    closed: AtomicBool,
}

impl RestDataClient {
    /// Build the HTTP client; no request is sent until the first call.
    pub fn new(opts: &ConnectOptions) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(opts)?,
            endpoint: opts.data_endpoint.trim_end_matches('/').to_string(),
            opts: opts.clone(),
            closed: AtomicBool::new(false),
        })
    }

    fn method_url(&self, table: &str, method: &str) -> String {
        format!("{}/v2/{}:{}", self.endpoint, self.opts.table_path(table), method)
    }

    fn routing(&self, table: &str) -> Option<String> {
        let mut params = wire::routing_header("table_name", &self.opts.table_path(table));
        if let Some(profile) = &self.opts.app_profile_id {
            params.push_str(&format!("&app_profile_id={}", profile));
        }
        Some(params)
    }

    fn app_profile(&self) -> Option<&str> {
        self.opts.app_profile_id.as_deref()
    }
}

impl DataClient for RestDataClient {
    fn read_rows(
        &self,
        table: &str,
        rows: &RowSet,
        filter: Option<&RowFilter>,
        visit: &mut dyn FnMut(Row) -> bool,
    ) -> Result<()> {
        ensure_open(&self.closed)?;
        let request = self
            .transport
            .http
            .post(self.method_url(table, "readRows"))
            .json(&wire::read_rows_request(rows, filter, self.app_profile()));
        let responses: Vec<ReadRowsResponse> =
            self.transport.send_stream(request, self.routing(table))?;

        let mut merger = ChunkMerger::new();
        for chunk in responses.iter().flat_map(|r| &r.chunks) {
            if let Some(row) = merger.push(chunk)? {
                if row.is_empty() {
                    continue;
                }
                if !visit(row) {
                    return Ok(());
                }
            }
        }
        merger.finish()
    }

    fn apply_bulk(
        &self,
        table: &str,
        keys: &[RowKey],
        mutations: &[Mutation],
    ) -> Result<Vec<RowError>> {
        ensure_open(&self.closed)?;
        check_bulk_shape(keys, mutations)?;
        let request = self
            .transport
            .http
            .post(self.method_url(table, "mutateRows"))
            .json(&wire::mutate_rows_request(keys, mutations, self.app_profile()));
        let responses: Vec<MutateRowsResponse> =
            self.transport.send_stream(request, self.routing(table))?;
        let errors = wire::bulk_errors(&responses, keys)?;
        debug!(table, rows = keys.len(), failed = errors.len(), "applied bulk mutation");
        Ok(errors)
    }

    fn sample_row_keys(&self, table: &str) -> Result<Vec<SampleKey>> {
        ensure_open(&self.closed)?;
        let mut request = self
            .transport
            .http
            .get(self.method_url(table, "sampleRowKeys"));
        if let Some(profile) = self.app_profile() {
            request = request.query(&[("appProfileId", profile)]);
        }
        let responses: Vec<SampleRowKeysResponse> =
            self.transport.send_stream(request, self.routing(table))?;
        Ok(wire::sample_keys(&responses)?)
    }

    fn close(&self) -> Result<()> {
        close_once(&self.closed)
    }
}

/// Build both clients for the configured instance
pub fn connect(opts: &ConnectOptions) -> Result<(RestAdminClient, RestDataClient)> {
    Ok((RestAdminClient::new(opts)?, RestDataClient::new(opts)?))
}
