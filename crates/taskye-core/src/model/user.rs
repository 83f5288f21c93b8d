// ── Users and the demo directory ──

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    User,
    #[serde(alias = "tecnico")]
    #[strum(to_string = "technician", serialize = "tecnico")]
    Technician,
}

/// The authenticated principal held by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(alias = "nome")]
    pub name: String,
    pub role: Role,
}

/// A directory entry: a user plus their password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    #[serde(alias = "senha", serialize_with = "expose", deserialize_with = "conceal")]
    pub password: SecretString,
}

fn expose<S: Serializer>(secret: &SecretString, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(secret.expose_secret())
}

fn conceal<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
    String::deserialize(d).map(SecretString::from)
}

impl UserRecord {
    fn demo(id: &str, email: &str, password: &str, name: &str, role: Role) -> Self {
        Self {
            user: User {
                id: id.to_owned(),
                email: email.to_owned(),
                name: name.to_owned(),
                role,
            },
            password: SecretString::from(password.to_owned()),
        }
    }

    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.user.email == email.trim() && self.password.expose_secret() == password
    }
}

/// Built-in demonstration accounts.
pub fn demo_users() -> Vec<UserRecord> {
    vec![
        UserRecord::demo("1", "admin@axis.com", "admin123", "Administrador", Role::Admin),
        UserRecord::demo("2", "user@axis.com", "user123", "Usuário Teste", Role::User),
        UserRecord::demo(
            "3",
            "tecnico@axis.com",
            "tec123",
            "Técnico Suporte",
            Role::Technician,
        ),
    ]
}
