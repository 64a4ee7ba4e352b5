use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConnectConfig, Scheme};
use crate::transport::test_support::ScriptedTransport;
use crate::transport::{CallOptions, Message, Response, Transport, TransportSettings};

use super::{ExecMode, Service, check_status, connect};

fn test_config() -> ConnectConfig {
    ConnectConfig {
        host: "svc.test".to_owned(),
        port: 8089,
        scheme: Scheme::Http,
        username: "admin".to_owned(),
        password: "changeme".to_owned(),
        settings: TransportSettings::default(),
    }
}

async fn scripted_service() -> Result<Service, String> {
    let transport = Arc::new(ScriptedTransport::new(Duration::ZERO));
    connect(&test_config(), transport)
        .await
        .map_err(|err| err.to_string())
}

#[tokio::test]
async fn connect_logs_in_and_yields_a_service() -> Result<(), String> {
    scripted_service().await.map(|_| ())
}

#[tokio::test]
async fn apps_lists_installed_names() -> Result<(), String> {
    let service = scripted_service().await?;
    let apps = service.apps().await.map_err(|err| err.to_string())?;
    let names: Vec<&str> = apps.iter().map(|app| app.name.as_str()).collect();
    assert_eq!(names, vec!["search", "launcher"]);
    Ok(())
}

#[tokio::test]
async fn confs_expose_stanza_name_and_content() -> Result<(), String> {
    let service = scripted_service().await?;
    let stanzas = service.confs("inputs").await.map_err(|err| err.to_string())?;
    let stanza = stanzas.first().ok_or("expected a stanza")?;
    assert_eq!(stanza.name(), "tcp://:9997");
    let index = stanza.read().get("index").ok_or("expected an index key")?;
    assert_eq!(index.as_str(), Some("main"));
    Ok(())
}

#[tokio::test]
async fn blocking_job_completes_and_returns_rows() -> Result<(), String> {
    let service = scripted_service().await?;
    let job = service
        .create_job("search * | head 100", ExecMode::Blocking)
        .await
        .map_err(|err| err.to_string())?;
    assert_eq!(job.sid(), "1");
    let rows = job.results().await.map_err(|err| err.to_string())?;
    assert_eq!(rows.len(), 1);
    Ok(())
}

#[tokio::test]
async fn unknown_endpoint_comes_back_as_a_404_response() -> Result<(), String> {
    let transport = ScriptedTransport::new(Duration::ZERO);
    let response = transport
        .request(
            "http://svc.test:8089/services/unknown",
            Message::get(),
            CallOptions::default(),
        )
        .await
        .map_err(|err| err.to_string())?;
    assert_eq!(response.status, 404);
    assert!(check_status(&response, &[200]).is_err());
    Ok(())
}

#[test]
fn check_status_accepts_allowed_statuses() {
    let response = Response::new(201, "Created".to_owned(), Vec::new(), Vec::new());
    assert!(check_status(&response, &[200, 201]).is_ok());
}

#[test]
fn check_status_rejects_everything_else() {
    let response = Response::new(503, "Service Unavailable".to_owned(), Vec::new(), Vec::new());
    let err = check_status(&response, &[200]);
    assert!(err.is_err());
}
