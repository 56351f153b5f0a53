//! Endpoint URL construction for the SQLplus host.
//!
//! All REST operations live under one DLL path on the SQLplus web server;
//! the legacy SOAP service lives at a fixed .asmx path on the same host.

/// Path of the ProcessData REST DLL on the SQLplus host.
pub const REST_BASE_PATH: &str = "ProcessData/AtProcessDataREST.dll";

/// Path of the legacy SQLplus SOAP web service.
pub const SOAP_PATH: &str = "SQLplusWebService/SQLplusWebService.asmx";

/// Build the REST URL for the SQL operation.
#[must_use]
pub fn sql_url(sqlplus_address: &str) -> String {
    format!("http://{sqlplus_address}/{REST_BASE_PATH}/SQL")
}

/// Build the REST URL for the History operation.
#[must_use]
pub fn history_url(sqlplus_address: &str) -> String {
    format!("http://{sqlplus_address}/{REST_BASE_PATH}/History")
}

/// Build the REST URL for the KPI operation.
#[must_use]
pub fn kpi_url(sqlplus_address: &str) -> String {
    format!("http://{sqlplus_address}/{REST_BASE_PATH}/KPI")
}

/// Build the URL of the legacy SOAP service.
#[must_use]
pub fn soap_url(sqlplus_address: &str) -> String {
    format!("http://{sqlplus_address}/{SOAP_PATH}")
}
