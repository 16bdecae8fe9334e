//! User, pending-user and login forms.

use super::{FieldSpec, FormSchema, FormState, Rule, ValidationErrors};
use crate::models::{LoginRequest, Role, User, UserPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFormMode {
    /// Registration or creation: password required.
    Create,
    /// Editing an existing account: blank password keeps the current one.
    Edit,
}

#[derive(Debug, Clone, Copy)]
pub struct UserSchema {
    pub mode: UserFormMode,
}

pub type UserForm = FormState<UserSchema>;

static CREATE_USER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "Nome", &[Rule::Required, Rule::MinLength(3)]),
    FieldSpec::text("email", "E-mail", &[Rule::Required, Rule::Email]),
    FieldSpec::text("password", "Senha", &[Rule::Required, Rule::MinLength(6)]),
    FieldSpec::text(
        "role",
        "Perfil",
        &[Rule::Required, Rule::OneOf(Role::WIRE_NAMES)],
    ),
];

static EDIT_USER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "Nome", &[Rule::Required, Rule::MinLength(3)]),
    FieldSpec::text("email", "E-mail", &[Rule::Required, Rule::Email]),
    FieldSpec::text("password", "Senha", &[Rule::MinLength(6)]),
    FieldSpec::text(
        "role",
        "Perfil",
        &[Rule::Required, Rule::OneOf(Role::WIRE_NAMES)],
    ),
];

impl FormSchema for UserSchema {
    fn fields(&self) -> &'static [FieldSpec] {
        match self.mode {
            UserFormMode::Create => CREATE_USER_FIELDS,
            UserFormMode::Edit => EDIT_USER_FIELDS,
        }
    }
}

impl FormState<UserSchema> {
    pub fn create() -> Self {
        Self::new(UserSchema {
            mode: UserFormMode::Create,
        })
    }

    /// Edit form for a user or pending user; the password starts blank.
    pub fn edit(user: &User) -> Self {
        let mut form = Self::new(UserSchema {
            mode: UserFormMode::Edit,
        });
        form.values.text.insert("name", user.name.clone());
        form.values.text.insert("email", user.email.clone());
        form.values
            .text
            .insert("role", user.role.as_wire().to_string());
        form
    }

    pub fn to_payload(&mut self) -> Result<UserPayload, ValidationErrors> {
        self.validate_all()?;
        let values = &self.values;
        let role = values.text("role").parse::<Role>().map_err(|error| {
            let mut errors = ValidationErrors::new();
            errors.insert("role", error.to_string());
            errors
        })?;
        let password = values.text("password");

        Ok(UserPayload {
            name: values.text("name").to_string(),
            email: values.text("email").to_string(),
            password: (!password.is_empty()).then(|| password.to_string()),
            role,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoginSchema;

pub type LoginForm = FormState<LoginSchema>;

static LOGIN_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("email", "E-mail", &[Rule::Required, Rule::Email]),
    FieldSpec::text("password", "Senha", &[Rule::Required]),
];

impl FormSchema for LoginSchema {
    fn fields(&self) -> &'static [FieldSpec] {
        LOGIN_FIELDS
    }
}

impl FormState<LoginSchema> {
    pub fn to_request(&mut self) -> Result<LoginRequest, ValidationErrors> {
        self.validate_all()?;
        Ok(LoginRequest {
            email: self.values.text("email").to_string(),
            password: self.values.text("password").to_string(),
        })
    }
}
