//! Local host name used to identify the server.

use crate::config::ServerConfig;

/// The OS host name could not be read.
#[derive(Debug, thiserror::Error)]
#[error("Failed to get server host name: {0}")]
pub struct HostNameError(#[from] nix::Error);

/// Configured host name if set, otherwise the OS host name.
pub fn local_host_name(config: &ServerConfig) -> Result<String, HostNameError> {
    if let Some(name) = &config.host_name {
        return Ok(name.clone());
    }

    let name = nix::unistd::gethostname()?;
    Ok(name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_name_wins() {
        let config = ServerConfig {
            host_name: Some("host-a".into()),
            ..ServerConfig::default()
        };
        assert_eq!(local_host_name(&config).unwrap(), "host-a");
    }

    #[test]
    fn falls_back_to_os_name() {
        let name = local_host_name(&ServerConfig::default()).unwrap();
        assert!(!name.is_empty());
    }
}
