use agenda_core::form::UserForm;
use agenda_core::models::{User, UserPayload};

use crate::cli::{PendingUserCommands, UserCommands, UserEditArgs};
use crate::commands::common::{format_user_lines, normalize_identifier, print_json, session_client};
use crate::error::CliError;

pub async fn run_users(command: UserCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let client = session_client(global_profile)?;

    match command {
        UserCommands::List { json } => render_users(&client.list_users().await?, json),
        UserCommands::Show { id, json } => {
            let id = normalize_identifier("User ID", &id)?;
            render_user(&client.get_user(&id).await?, json)
        }
        UserCommands::Edit { id, changes } => {
            let id = normalize_identifier("User ID", &id)?;
            let user = client.get_user(&id).await?;
            let payload = edited_user_payload(&user, changes)?;
            client.update_user(&id, &payload).await?;
            println!("{id}");
            Ok(())
        }
        UserCommands::Delete { id } => {
            let id = normalize_identifier("User ID", &id)?;
            client.delete_user(&id).await?;
            println!("{id}");
            Ok(())
        }
    }
}

pub async fn run_pending_users(
    command: PendingUserCommands,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let client = session_client(global_profile)?;

    match command {
        PendingUserCommands::List { json } => {
            render_users(&client.list_pending_users().await?, json)
        }
        PendingUserCommands::Show { id, json } => {
            let id = normalize_identifier("Pending user ID", &id)?;
            render_user(&client.get_pending_user(&id).await?, json)
        }
        PendingUserCommands::Edit { id, changes } => {
            let id = normalize_identifier("Pending user ID", &id)?;
            let user = client.get_pending_user(&id).await?;
            let payload = edited_user_payload(&user, changes)?;
            client.update_pending_user(&id, &payload).await?;
            println!("{id}");
            Ok(())
        }
        PendingUserCommands::Approve { id } => {
            let id = normalize_identifier("Pending user ID", &id)?;
            client.approve_pending_user(&id).await?;
            println!("{id}");
            Ok(())
        }
        PendingUserCommands::Reject { id } => {
            let id = normalize_identifier("Pending user ID", &id)?;
            client.reject_pending_user(&id).await?;
            println!("{id}");
            Ok(())
        }
        PendingUserCommands::Delete { id } => {
            let id = normalize_identifier("Pending user ID", &id)?;
            client.delete_pending_user(&id).await?;
            println!("{id}");
            Ok(())
        }
    }
}

/// Apply the given flags on top of the stored account and validate.
pub fn edited_user_payload(user: &User, changes: UserEditArgs) -> Result<UserPayload, CliError> {
    let mut form = UserForm::edit(user);
    if let Some(name) = changes.name {
        form.set("name", name)?;
    }
    if let Some(email) = changes.email {
        form.set("email", email)?;
    }
    if let Some(password) = changes.password {
        form.set("password", password)?;
    }
    if let Some(role) = changes.role {
        form.set("role", role)?;
    }
    Ok(form.to_payload()?)
}

fn render_users(users: &[User], as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(users);
    }
    if users.is_empty() {
        println!("Nenhum usuário encontrado.");
    }
    for line in format_user_lines(users) {
        println!("{line}");
    }
    Ok(())
}

fn render_user(user: &User, as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(user);
    }
    println!("ID:     {}", user.id);
    println!("Nome:   {}", user.name);
    println!("E-mail: {}", user.email);
    println!("Perfil: {}", user.role);
    Ok(())
}
