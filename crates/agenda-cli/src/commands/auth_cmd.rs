use agenda_core::form::UserForm;

use crate::auth::{auth_service_for_profile, clear_stored_session, load_stored_session};
use crate::cli::AuthCommands;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();

    match command {
        AuthCommands::Login { email, password } => {
            let mut service = auth_service_for_profile(&profile_name, &profile)?;
            let session = service.login(&email, &password).await?;
            println!(
                "Signed in profile '{profile_name}' as {} ({})",
                session.name, session.role
            );
            Ok(())
        }
        AuthCommands::Register {
            name,
            email,
            password,
            role,
        } => {
            let mut form = UserForm::create();
            form.set("name", name)?;
            form.set("email", email)?;
            form.set("password", password)?;
            form.set("role", role)?;
            let payload = form.to_payload()?;

            let service = auth_service_for_profile(&profile_name, &profile)?;
            service.register(&payload).await?;
            println!(
                "Registration for {} submitted; it must be approved before signing in",
                payload.email
            );
            Ok(())
        }
        AuthCommands::Status => {
            match load_stored_session(&profile_name)? {
                Some(session) => println!(
                    "Profile '{profile_name}' is signed in as {} ({}, id={})",
                    session.name, session.role, session.id
                ),
                None => println!("Profile '{profile_name}' is not signed in."),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            if profile.api_base_url().is_some() {
                auth_service_for_profile(&profile_name, &profile)?.logout()?;
            } else {
                clear_stored_session(&profile_name)?;
            }
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}
