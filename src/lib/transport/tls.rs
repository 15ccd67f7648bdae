use axum_server::tls_rustls::RustlsConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

pub async fn configure_tls(config: &TlsConfig) -> Result<RustlsConfig, anyhow::Error> {
    RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "failed to load TLS certificate {} / key {}: {e}",
                config.cert_path.display(),
                config.key_path.display()
            )
        })
}
