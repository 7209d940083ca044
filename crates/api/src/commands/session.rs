//! Account and login session commands

use eyecare_core::RoleProfile;
use eyecare_domain::{ProfileUpdate, RegisterRequest, User};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Log in; returns the user id now stored in the session.
pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<String, String> {
    execute_command("session::login", || ctx.session.login(email, password)).await
}

pub async fn register(
    ctx: &AppContext,
    request: &RegisterRequest,
) -> Result<Option<String>, String> {
    execute_command("session::register", || ctx.session.register(request)).await
}

pub async fn logout(ctx: &AppContext) -> Result<(), String> {
    execute_command("session::logout", || ctx.session.logout()).await
}

/// Account of the logged-in user.
pub async fn current_user(ctx: &AppContext) -> Result<User, String> {
    execute_command("session::current_user", || ctx.session.current_user()).await
}

/// Doctor or patient profile of the logged-in user, if one exists.
pub async fn role_profile(ctx: &AppContext) -> Result<Option<RoleProfile>, String> {
    execute_command("session::role_profile", || ctx.session.role_profile()).await
}

/// Role profile of the logged-in user, created empty when missing.
pub async fn ensure_role_profile(ctx: &AppContext) -> Result<Option<RoleProfile>, String> {
    execute_command("session::ensure_role_profile", || ctx.session.ensure_role_profile()).await
}

/// Save account settings: the account name, then the role record.
pub async fn update_profile(
    ctx: &AppContext,
    update: &ProfileUpdate,
) -> Result<Option<RoleProfile>, String> {
    execute_command("session::update_profile", || ctx.session.update_profile(update)).await
}

pub async fn change_password(ctx: &AppContext, new_password: &str) -> Result<(), String> {
    execute_command("session::change_password", || ctx.session.change_password(new_password))
        .await
}
