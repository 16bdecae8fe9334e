use crate::cli::ConfigCommands;
use crate::commands::common::print_json;
use crate::config_profiles::{normalize_text_option, CliProfilesConfig, API_BASE_URL_ENV};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            timeout_secs,
            no_activate,
        } => run_config_init(
            global_profile,
            api_base_url,
            timeout_secs,
            no_activate,
        ),
        ConfigCommands::Show { json } => run_config_show(global_profile, json),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let merged_api_base_url = normalize_text_option(api_base_url)
        .or_else(|| normalize_text_option(std::env::var(API_BASE_URL_ENV).ok()));

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(value) = merged_api_base_url {
        profile.api_base_url = Some(value);
    }
    if timeout_secs.is_some() {
        profile.timeout_secs = timeout_secs;
    }
    profile.validate().map_err(CliError::Config)?;
    let ready = profile.api_base_url().is_some();

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    if ready {
        println!(
            "Run `agenda auth login --email <email> --password <password>` to sign in."
        );
    } else {
        println!("Profile '{profile_name}' is missing: api_base_url");
    }

    Ok(())
}

fn run_config_show(global_profile: Option<&str>, as_json: bool) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();

    if as_json {
        return print_json(&serde_json::json!({
            "profile": profile_name,
            "apiBaseUrl": profile.api_base_url(),
            "timeoutSecs": profile.timeout_secs,
        }));
    }

    println!("profile:      {profile_name}");
    println!(
        "api_base_url: {}",
        profile.api_base_url().as_deref().unwrap_or("(not set)")
    );
    match profile.timeout_secs {
        Some(secs) => println!("timeout_secs: {secs}"),
        None => println!("timeout_secs: (default)"),
    }
    Ok(())
}
