use crate::core::{
    domain::error::VsphereError,
    infrastructure::env_config::{EnvConfig, VSPHERE_HOST, VSPHERE_PASSWORD},
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, dotenvy::Error> {
    dotenvy::from_path_iter(path)?.collect()
}

fn config_from_file(path: &Path) -> Result<EnvConfig, VsphereError> {
    let vars = read_env_file(path).map_err(|e| VsphereError::Configuration(e.to_string()))?;
    EnvConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_env_file_with_all_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(
        &path,
        "# lab vCenter\n\
         VSPHERE_HOST=vcenter.lab.local\n\
         VSPHERE_PORT=8443\n\
         VSPHERE_USERNAME=ops@vsphere.local\n\
         VSPHERE_PASSWORD=\"s3cret with spaces\"\n\
         VSPHERE_ACCEPT_INVALID_CERTS=yes\n\
         VSPHERE_DATASTORE=vsanDatastore\n\
         VSPHERE_TASK_TIMEOUT_SECS=600\n\
         VSPHERE_RATE_LIMIT_RPS=20\n",
    )
    .unwrap();

    let config = config_from_file(&path).unwrap();
    assert_eq!(config.connection.host().as_str(), "vcenter.lab.local");
    assert_eq!(config.connection.port(), 8443);
    assert_eq!(config.connection.username().as_str(), "ops@vsphere.local");
    assert_eq!(config.connection.password().as_str(), "s3cret with spaces");
    assert!(config.connection.accept_invalid_certs());
    assert_eq!(config.settings.datastore, "vsanDatastore");
    assert_eq!(config.settings.task_timeout, Duration::from_secs(600));

    let rate_limit = config.settings.rate_limit.unwrap();
    assert_eq!(rate_limit.requests_per_second, 20);
    assert_eq!(rate_limit.burst_size, 20);
}

#[test]
fn test_env_file_minimal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(
        &path,
        "VSPHERE_HOST=10.0.0.5\nVSPHERE_USERNAME=root\nVSPHERE_PASSWORD=changeme-lab\n",
    )
    .unwrap();

    let config = config_from_file(&path).unwrap();
    assert_eq!(config.connection.port(), 443);
    assert!(!config.connection.accept_invalid_certs());
    assert!(config.connection.url().is_https());
    assert_eq!(config.settings.datastore, "NFS_share");
    assert!(config.settings.insecure_fallback);
    assert!(config.settings.rate_limit.is_none());
}

#[test]
fn test_env_file_missing_password() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(
        &path,
        "VSPHERE_HOST=vcenter.lab.local\nVSPHERE_USERNAME=ops@vsphere.local\n",
    )
    .unwrap();

    match config_from_file(&path) {
        Err(VsphereError::Configuration(message)) => assert!(message.contains(VSPHERE_PASSWORD)),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_env_file_invalid_host() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(
        &path,
        "VSPHERE_HOST=vcenter..lab\nVSPHERE_USERNAME=ops\nVSPHERE_PASSWORD=changeme-lab\n",
    )
    .unwrap();

    let err = config_from_file(&path).unwrap_err();
    assert!(err.is_validation(), "{} was accepted", VSPHERE_HOST);
}

#[test]
fn test_malformed_env_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, "VSPHERE_HOST='unterminated\n").unwrap();

    assert!(read_env_file(&path).is_err());
}

#[test]
fn test_missing_env_file() {
    let dir = tempdir().unwrap();
    assert!(read_env_file(&dir.path().join(".env")).is_err());
}
