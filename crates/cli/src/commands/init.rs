use std::path::Path;

use grpsync_core::config::GrpsyncConfig;
use tracing::info;

/// Run the `init` command: write a default configuration file.
pub fn run(config_path: &str, force: bool) -> anyhow::Result<()> {
    let path = Path::new(config_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let config = GrpsyncConfig::generate_default();
    std::fs::write(path, config.to_toml()?)?;
    info!("Wrote configuration to {}", path.display());

    println!("Configuration written to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set the LDAP server, base DN and bind credentials");
    println!("  2. Set the Zabbix URL and an API token or login");
    println!("  3. List the groups to reconcile");
    println!("  4. Run `grpsync check` to test both connections");
    println!("  5. Run `grpsync sync` to perform the first reconciliation");

    Ok(())
}
