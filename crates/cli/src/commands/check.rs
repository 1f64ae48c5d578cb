use std::path::Path;

use grpsync_core::config::GrpsyncConfig;
use grpsync_ldap::client::LdapDirectory;
use grpsync_zabbix::client::ZabbixClient;
use tracing::info;

/// Run the `check` command: validate configuration and open both connections.
///
/// Nothing is created or modified in either system.
pub async fn run(config_path: &str) -> anyhow::Result<()> {
    let config = GrpsyncConfig::load(Path::new(config_path))?;
    config.validate()?;
    println!(
        "Configuration OK: {} group(s) to reconcile",
        config.groups.len()
    );

    println!("Testing LDAP connection to {}...", config.ldap.server);
    let directory = LdapDirectory::connect(&config.ldap).await?;
    directory.unbind().await?;
    println!("LDAP connection successful!");

    println!("Testing Zabbix API at {}...", config.zabbix.url);
    let zabbix = ZabbixClient::connect(&config.zabbix).await?;
    let version = zabbix.api_version().await?;
    zabbix.logout().await?;
    info!(version = %version, "Zabbix API reachable");
    println!("Zabbix API {version} login successful!");

    Ok(())
}
