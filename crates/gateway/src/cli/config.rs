use tc_domain::config::{Config, ConfigSeverity};

/// Validate the loaded config, printing every issue found.
///
/// Returns `false` when any error-severity issue is present so the
/// caller can exit non-zero; warnings alone still pass.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();
    if issues.is_empty() {
        println!("{config_path}: configuration is valid");
        return true;
    }

    for issue in &issues {
        println!("{issue}");
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    let warnings = issues.len() - errors;
    println!("\n{config_path}: {errors} error(s), {warnings} warning(s)");

    errors == 0
}

/// Print the effective configuration, defaults included, as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => {
            eprintln!("could not render config: {e}");
            std::process::exit(1);
        }
    }
}
